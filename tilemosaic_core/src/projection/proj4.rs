use super::Projection;
use crate::GeoPoint;
use anyhow::{Result, anyhow};
use proj4rs::{proj::Proj, transform::transform};

const WGS84_DEFINITION: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Any SRID known to the `crs-definitions` database, projected through `proj4rs`.
///
/// Only the definition string is kept; a `Proj` is built per call so the projection
/// can be shared between threads.
#[derive(Debug, Clone)]
pub struct Proj4Projection {
	srid: i32,
	definition: &'static str,
	geographic: bool,
}

impl Proj4Projection {
	/// `None` if the code is unknown or its definition does not parse.
	#[must_use]
	pub fn new(srid: i32) -> Option<Proj4Projection> {
		let definition = u16::try_from(srid).ok().and_then(crs_definitions::from_code)?.proj4;
		if let Err(e) = Proj::from_proj_string(definition) {
			log::warn!("EPSG:{srid} has an unusable proj4 definition: {e:?}");
			return None;
		}
		Some(Proj4Projection {
			srid,
			definition,
			geographic: definition.contains("+proj=longlat"),
		})
	}

	fn native(&self) -> Result<Proj> {
		Proj::from_proj_string(self.definition).map_err(|e| anyhow!("invalid projection EPSG:{}: {e:?}", self.srid))
	}

	fn wgs84() -> Result<Proj> {
		Proj::from_proj_string(WGS84_DEFINITION).map_err(|e| anyhow!("invalid WGS 84 definition: {e:?}"))
	}
}

impl Projection for Proj4Projection {
	fn srid(&self) -> i32 {
		self.srid
	}

	fn forward(&self, point: GeoPoint) -> Result<(f64, f64)> {
		let mut p = (point.longitude.to_radians(), point.latitude.to_radians(), 0.0);
		transform(&Self::wgs84()?, &self.native()?, &mut p)
			.map_err(|e| anyhow!("projecting {point:?} to EPSG:{} failed: {e:?}", self.srid))?;
		Ok(if self.geographic {
			(p.0.to_degrees(), p.1.to_degrees())
		} else {
			(p.0, p.1)
		})
	}

	fn inverse(&self, x: f64, y: f64) -> Result<GeoPoint> {
		let mut p = if self.geographic {
			(x.to_radians(), y.to_radians(), 0.0)
		} else {
			(x, y, 0.0)
		};
		transform(&self.native()?, &Self::wgs84()?, &mut p)
			.map_err(|e| anyhow!("projecting ({x}, {y}) from EPSG:{} failed: {e:?}", self.srid))?;
		Ok(GeoPoint::new(p.1.to_degrees(), p.0.to_degrees()))
	}
}
