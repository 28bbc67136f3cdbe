//! Coordinate projections between a native SRID and geographic WGS 84.
//!
//! Only coordinates are projected, never pixel content. The two SRIDs every tile pyramid
//! in practice uses (EPSG:4326 and EPSG:3857) are implemented directly; any other code is
//! resolved through the `crs-definitions` database and projected with `proj4rs`.

mod equirectangular;
mod proj4;
mod web_mercator;

pub use equirectangular::Equirectangular;
pub use proj4::Proj4Projection;
pub use web_mercator::WebMercator;

use crate::{Envelope, GeoPoint, MosaicError};
use anyhow::{Result, anyhow};
use std::{fmt::Debug, sync::Arc};

/// A bidirectional mapping between native coordinates and WGS 84 degrees.
pub trait Projection: Debug + Send + Sync {
	fn srid(&self) -> i32;

	/// Geographic to native.
	fn forward(&self, point: GeoPoint) -> Result<(f64, f64)>;

	/// Native to geographic.
	fn inverse(&self, x: f64, y: f64) -> Result<GeoPoint>;
}

/// Looks up the projection for `srid`.
///
/// Fails with [`MosaicError::UnsupportedSrid`] when the code is unknown.
pub fn get_projection(srid: i32) -> Result<Arc<dyn Projection>> {
	Ok(match srid {
		4326 => Arc::new(Equirectangular),
		3857 | 3785 | 900_913 | 102_100 | 102_113 => Arc::new(WebMercator::new(srid)),
		_ => Arc::new(Proj4Projection::new(srid).ok_or(MosaicError::UnsupportedSrid(srid))?),
	})
}

/// Transforms `envelope` from one projection to another by projecting its four corners
/// and taking the bounding box of the result.
pub fn transform_envelope(envelope: &Envelope, from: &dyn Projection, to: &dyn Projection) -> Result<Envelope> {
	if from.srid() == to.srid() {
		return Ok(*envelope);
	}

	let points = envelope
		.corners()
		.into_iter()
		.map(|(x, y)| to.forward(from.inverse(x, y)?))
		.collect::<Result<Vec<_>>>()?;

	Envelope::from_points(points).ok_or_else(|| anyhow!("no corners to transform"))
}
