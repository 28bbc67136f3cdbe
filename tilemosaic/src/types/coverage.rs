use geo::Polygon;
use std::fmt::Debug;
use tilemosaic_core::Envelope;

/// The spatial and resolution extent of one dataset, always in WGS 84 degrees.
///
/// `min_gsd` is the numerically smallest (finest) resolution, `max_gsd` the largest.
#[derive(Clone, PartialEq)]
pub struct Coverage {
	envelope: Envelope,
	min_gsd: f64,
	max_gsd: f64,
}

impl Coverage {
	#[must_use]
	pub fn new(envelope: Envelope, min_gsd: f64, max_gsd: f64) -> Coverage {
		Coverage {
			envelope,
			min_gsd,
			max_gsd,
		}
	}

	pub fn envelope(&self) -> &Envelope {
		&self.envelope
	}

	/// The envelope as a closed polygon.
	pub fn geometry(&self) -> Polygon<f64> {
		self.envelope.to_polygon()
	}

	pub fn min_gsd(&self) -> f64 {
		self.min_gsd
	}

	pub fn max_gsd(&self) -> f64 {
		self.max_gsd
	}
}

impl Debug for Coverage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"Coverage({:?}, gsd {}..={})",
			self.envelope, self.min_gsd, self.max_gsd
		)
	}
}
