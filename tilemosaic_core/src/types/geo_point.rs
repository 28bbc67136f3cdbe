use std::fmt::Debug;

/// A point in the canonical geographic CRS (EPSG:4326), in degrees.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
	pub latitude: f64,
	pub longitude: f64,
}

impl GeoPoint {
	#[must_use]
	pub fn new(latitude: f64, longitude: f64) -> GeoPoint {
		GeoPoint { latitude, longitude }
	}

	/// `(x, y)` ordering, i.e. `(longitude, latitude)`.
	#[must_use]
	pub fn as_xy(&self) -> (f64, f64) {
		(self.longitude, self.latitude)
	}
}

impl Debug for GeoPoint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "GeoPoint(lat: {}, lon: {})", self.latitude, self.longitude)
	}
}
