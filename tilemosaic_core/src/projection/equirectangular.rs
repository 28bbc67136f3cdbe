use super::Projection;
use crate::GeoPoint;
use anyhow::Result;

/// EPSG:4326, where native coordinates already are longitude and latitude.
#[derive(Debug, Clone, Copy, Default)]
pub struct Equirectangular;

impl Projection for Equirectangular {
	fn srid(&self) -> i32 {
		4326
	}

	fn forward(&self, point: GeoPoint) -> Result<(f64, f64)> {
		Ok(point.as_xy())
	}

	fn inverse(&self, x: f64, y: f64) -> Result<GeoPoint> {
		Ok(GeoPoint::new(y, x))
	}
}
