use super::{RuntimeBuilder, RuntimeInner, builder::assemble};
use crate::{
	DatasetDescriptor, MosaicConfig, MosaicDatabase, MosaicDatabaseFactory, MosaicDatabaseType,
	TileContainerMosaicDatabase, dataset,
};
use anyhow::Result;
use std::{path::Path, sync::Arc};
use tilemosaic_container::{ActiveContainers, ResampleFilter, TileReaderAdapter};

/// Shared services for mosaic queries.
///
/// Cheap to clone; clones share the container registry and the database factory.
/// Separate runtimes are fully independent, which keeps tests isolated.
#[derive(Clone)]
pub struct MosaicRuntime {
	pub(crate) inner: Arc<RuntimeInner>,
}

impl MosaicRuntime {
	/// Create a builder for customizing the runtime
	pub fn builder() -> RuntimeBuilder {
		RuntimeBuilder::default()
	}

	/// A runtime configured by `config`.
	pub fn new(config: &MosaicConfig) -> Result<Self> {
		Self::builder().config(config.clone()).build()
	}

	/// Registry of the containers currently opened through this runtime.
	pub fn containers(&self) -> &ActiveContainers {
		&self.inner.containers
	}

	pub fn factory(&self) -> &MosaicDatabaseFactory {
		&self.inner.factory
	}

	pub fn resample_filter(&self) -> ResampleFilter {
		self.inner.resample_filter
	}

	/// Opens `path` with the highest-priority dataset type accepting it.
	pub fn open_database(&self, path: &Path) -> Result<Option<Box<dyn MosaicDatabase>>> {
		self.inner.factory.open(path)
	}

	/// An unopened database of the type called `name`.
	pub fn create_database(&self, name: &str) -> Option<TileContainerMosaicDatabase> {
		self.inner.factory.create(name)
	}

	/// Whether `path` is a readable dataset. Leaves no container open.
	pub fn probe(&self, path: &Path) -> bool {
		dataset::probe(path, self.inner.factory.options())
	}

	pub fn describe(&self, path: &Path) -> Result<Option<DatasetDescriptor>> {
		dataset::describe(path, self.inner.factory.options())
	}

	/// A reader for a `tiles://` locator produced by a query of this runtime.
	pub fn tile_reader(&self, uri: &str) -> Option<TileReaderAdapter> {
		TileReaderAdapter::create(&self.inner.containers, uri, self.inner.resample_filter)
	}
}

impl Default for MosaicRuntime {
	fn default() -> Self {
		let options = MosaicConfig::default();
		assemble(
			options.container_options(),
			options.resample_filter,
			vec![MosaicDatabaseType::customtiles().with_priority(1)],
			None,
		)
	}
}
