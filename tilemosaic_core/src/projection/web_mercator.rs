//! Spherical Web Mercator on the WGS 84 semi-major axis.

use super::Projection;
use crate::GeoPoint;
use anyhow::Result;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// WGS 84 semi-major axis in metres.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude at which the square Web Mercator world ends, `atan(sinh(PI))` in degrees.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

#[derive(Debug, Clone, Copy)]
pub struct WebMercator {
	srid: i32,
}

impl WebMercator {
	/// `srid` is the code this instance reports; all Web Mercator aliases share the math.
	#[must_use]
	pub fn new(srid: i32) -> WebMercator {
		WebMercator { srid }
	}
}

impl Projection for WebMercator {
	fn srid(&self) -> i32 {
		self.srid
	}

	fn forward(&self, point: GeoPoint) -> Result<(f64, f64)> {
		let lon = point.longitude.clamp(-180.0, 180.0);
		let lat = point.latitude.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
		Ok((
			EARTH_RADIUS * lon.to_radians(),
			EARTH_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln(),
		))
	}

	fn inverse(&self, x: f64, y: f64) -> Result<GeoPoint> {
		Ok(GeoPoint::new(
			(2.0 * (y / EARTH_RADIUS).exp().atan() - FRAC_PI_2).to_degrees(),
			(x / EARTH_RADIUS).to_degrees(),
		))
	}
}
