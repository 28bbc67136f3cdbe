use crate::MosaicDatabaseFactory;
use tilemosaic_container::{ActiveContainers, ResampleFilter};

pub(crate) struct RuntimeInner {
	pub(crate) containers: ActiveContainers,
	pub(crate) factory: MosaicDatabaseFactory,
	pub(crate) resample_filter: ResampleFilter,
}
