//! Axis-aligned bounding boxes in an arbitrary spatial reference.
//!
//! An [`Envelope`] carries no SRID of its own; the owner (a container, a coverage, a
//! query) states which reference system the numbers are in.
//!
//! # Examples
//!
//! ```
//! use tilemosaic_core::Envelope;
//!
//! let a = Envelope::new(0.0, 0.0, 10.0, 10.0).unwrap();
//! let b = Envelope::new(5.0, -5.0, 20.0, 5.0).unwrap();
//! assert!(a.intersects(&b));
//! assert_eq!(a.intersection(&b).unwrap().as_tuple(), (5.0, 0.0, 10.0, 5.0));
//! ```

use anyhow::{Result, ensure};
use geo::{BoundingRect, Coord, Geometry, Polygon, Rect};
use std::fmt::Debug;

#[derive(Clone, Copy, PartialEq)]
pub struct Envelope {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Envelope {
	/// Creates a new envelope. Fails on NaN values or inverted axes.
	pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Envelope> {
		ensure!(
			!(min_x.is_nan() || min_y.is_nan() || max_x.is_nan() || max_y.is_nan()),
			"envelope must not contain NaN"
		);
		ensure!(min_x <= max_x, "min_x ({min_x}) must be <= max_x ({max_x})");
		ensure!(min_y <= max_y, "min_y ({min_y}) must be <= max_y ({max_y})");
		Ok(Envelope {
			min_x,
			min_y,
			max_x,
			max_y,
		})
	}

	/// Smallest envelope containing all `points`. `None` for an empty iterator.
	pub fn from_points<I>(points: I) -> Option<Envelope>
	where
		I: IntoIterator<Item = (f64, f64)>,
	{
		let mut iter = points.into_iter();
		let (x, y) = iter.next()?;
		let mut envelope = Envelope {
			min_x: x,
			min_y: y,
			max_x: x,
			max_y: y,
		};
		for (x, y) in iter {
			envelope.min_x = envelope.min_x.min(x);
			envelope.min_y = envelope.min_y.min(y);
			envelope.max_x = envelope.max_x.max(x);
			envelope.max_y = envelope.max_y.max(y);
		}
		Some(envelope)
	}

	/// Bounding box of an arbitrary geometry. `None` for empty geometries.
	pub fn of_geometry(geometry: &Geometry<f64>) -> Option<Envelope> {
		geometry.bounding_rect().map(Envelope::from)
	}

	#[must_use]
	pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
		(self.min_x, self.min_y, self.max_x, self.max_y)
	}

	#[must_use]
	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	#[must_use]
	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	/// Corner points in the order upper-left, upper-right, lower-right, lower-left.
	#[must_use]
	pub fn corners(&self) -> [(f64, f64); 4] {
		[
			(self.min_x, self.max_y),
			(self.max_x, self.max_y),
			(self.max_x, self.min_y),
			(self.min_x, self.min_y),
		]
	}

	/// Closed-interval intersection test; envelopes sharing only an edge intersect.
	#[must_use]
	pub fn intersects(&self, other: &Envelope) -> bool {
		self.min_x <= other.max_x && other.min_x <= self.max_x && self.min_y <= other.max_y && other.min_y <= self.max_y
	}

	/// The overlapping region, or `None` if the envelopes are disjoint.
	#[must_use]
	pub fn intersection(&self, other: &Envelope) -> Option<Envelope> {
		if !self.intersects(other) {
			return None;
		}
		Some(Envelope {
			min_x: self.min_x.max(other.min_x),
			min_y: self.min_y.max(other.min_y),
			max_x: self.max_x.min(other.max_x),
			max_y: self.max_y.min(other.max_y),
		})
	}

	/// The closed five-point ring polygon of this envelope.
	#[must_use]
	pub fn to_polygon(&self) -> Polygon<f64> {
		Rect::from(*self).to_polygon()
	}
}

impl From<Rect<f64>> for Envelope {
	fn from(rect: Rect<f64>) -> Self {
		let (min, max) = (rect.min(), rect.max());
		Envelope {
			min_x: min.x,
			min_y: min.y,
			max_x: max.x,
			max_y: max.y,
		}
	}
}

impl From<Envelope> for Rect<f64> {
	fn from(envelope: Envelope) -> Self {
		Rect::new(
			Coord {
				x: envelope.min_x,
				y: envelope.min_y,
			},
			Coord {
				x: envelope.max_x,
				y: envelope.max_y,
			},
		)
	}
}

impl Debug for Envelope {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"Envelope({}, {}, {}, {})",
			self.min_x, self.min_y, self.max_x, self.max_y
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use geo::{LineString, MultiPoint, Point};
	use rstest::rstest;

	#[test]
	fn new_rejects_inverted_axes() {
		assert!(Envelope::new(1.0, 0.0, 0.0, 1.0).is_err());
		assert!(Envelope::new(0.0, 1.0, 1.0, 0.0).is_err());
		assert!(Envelope::new(f64::NAN, 0.0, 1.0, 1.0).is_err());
		assert!(Envelope::new(0.0, 0.0, 0.0, 0.0).is_ok());
	}

	#[rstest]
	#[case((0., 0., 10., 10.), (5., 5., 15., 15.), Some((5., 5., 10., 10.)))]
	#[case((0., 0., 10., 10.), (10., 0., 20., 10.), Some((10., 0., 10., 10.)))]
	#[case((0., 0., 10., 10.), (11., 0., 20., 10.), None)]
	#[case((0., 0., 10., 10.), (2., 2., 3., 3.), Some((2., 2., 3., 3.)))]
	fn intersection(
		#[case] a: (f64, f64, f64, f64),
		#[case] b: (f64, f64, f64, f64),
		#[case] expected: Option<(f64, f64, f64, f64)>,
	) {
		let a = Envelope::new(a.0, a.1, a.2, a.3).unwrap();
		let b = Envelope::new(b.0, b.1, b.2, b.3).unwrap();
		assert_eq!(a.intersection(&b).map(|e| e.as_tuple()), expected);
		assert_eq!(b.intersection(&a).map(|e| e.as_tuple()), expected);
	}

	#[test]
	fn from_points() {
		let envelope = Envelope::from_points([(3.0, -1.0), (-2.0, 4.0), (0.5, 0.5)]).unwrap();
		assert_eq!(envelope.as_tuple(), (-2.0, -1.0, 3.0, 4.0));
		assert!(Envelope::from_points(Vec::new()).is_none());
	}

	#[test]
	fn polygon_round_trip() {
		let envelope = Envelope::new(-10.0, -5.0, 10.0, 5.0).unwrap();
		let polygon = envelope.to_polygon();
		assert_eq!(polygon.exterior().0.len(), 5);
		assert_eq!(Envelope::of_geometry(&Geometry::Polygon(polygon)), Some(envelope));
	}

	#[test]
	fn of_geometry() {
		let line = Geometry::LineString(LineString::from(vec![(1.0, 2.0), (-3.0, 7.0)]));
		assert_eq!(Envelope::of_geometry(&line).unwrap().as_tuple(), (-3.0, 2.0, 1.0, 7.0));

		let empty = Geometry::MultiPoint(MultiPoint::<f64>(vec![]));
		assert_eq!(Envelope::of_geometry(&empty), None);

		let point = Geometry::Point(Point::new(4.0, 5.0));
		assert_eq!(Envelope::of_geometry(&point).unwrap().as_tuple(), (4.0, 5.0, 4.0, 5.0));
	}

	#[test]
	fn corners_and_size() {
		let envelope = Envelope::new(0.0, 0.0, 4.0, 2.0).unwrap();
		assert_eq!(envelope.corners(), [(0.0, 2.0), (4.0, 2.0), (4.0, 0.0), (0.0, 0.0)]);
		assert_eq!(envelope.width(), 4.0);
		assert_eq!(envelope.height(), 2.0);
	}

	#[test]
	fn debug_format() {
		let envelope = Envelope::new(-10.0, -5.0, 10.0, 5.0).unwrap();
		assert_eq!(format!("{envelope:?}"), "Envelope(-10, -5, 10, 5)");
	}
}
