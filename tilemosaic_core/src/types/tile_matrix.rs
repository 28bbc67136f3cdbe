//! The tile-matrix abstraction: a pyramid described by its SRID, origin, bounds and
//! ascending zoom levels, plus the grid arithmetic every consumer needs.
//!
//! Rows grow downward from `origin_y`, columns grow rightward from `origin_x`.

use super::{Envelope, ZoomLevel};
use std::fmt::Debug;

/// Metres per degree of latitude, used to approximate a ground resolution for
/// geographic pyramids.
pub const METERS_PER_DEGREE: f64 = 111_111.0;

/// Geographic spatial reference identifier (WGS 84).
pub const SRID_WGS84: i32 = 4326;

/// A pyramid of equally sized tiles.
pub trait TileMatrix: Send + Sync {
	fn name(&self) -> &str;
	fn srid(&self) -> i32;
	fn origin_x(&self) -> f64;
	fn origin_y(&self) -> f64;

	/// Zoom levels, ascending by `level` (coarsest first).
	fn zoom_levels(&self) -> &[ZoomLevel];

	/// Data bounds in the native SRID.
	fn bounds(&self) -> Envelope;

	/// The upper-left corner of tile `(row, column)`.
	fn tile_point(&self, zoom_level: &ZoomLevel, row: u32, column: u32) -> (f64, f64) {
		let (span_x, span_y) = zoom_level.tile_span();
		(
			self.origin_x() + f64::from(column) * span_x,
			self.origin_y() - f64::from(row) * span_y,
		)
	}

	/// The native-SRID extent of tile `(row, column)`.
	fn tile_envelope(&self, zoom_level: &ZoomLevel, row: u32, column: u32) -> Envelope {
		let (span_x, span_y) = zoom_level.tile_span();
		let (min_x, max_y) = self.tile_point(zoom_level, row, column);
		Envelope {
			min_x,
			min_y: max_y - span_y,
			max_x: min_x + span_x,
			max_y,
		}
	}

	/// Tiles of `zoom_level` touching `envelope`.
	///
	/// A trailing edge lying exactly on a tile boundary does not pull in the next tile.
	/// Indices are clamped at zero.
	fn tile_range(&self, zoom_level: &ZoomLevel, envelope: &Envelope) -> TileRange {
		let (span_x, span_y) = zoom_level.tile_span();
		let clamp = |v: f64| v.max(0.0).min(f64::from(u32::MAX)) as u32;

		let min_column = clamp(((envelope.min_x - self.origin_x()) / span_x).floor());
		let min_row = clamp(((self.origin_y() - envelope.max_y) / span_y).floor());
		let max_column = clamp(((envelope.max_x - self.origin_x()) / span_x).ceil() - 1.0);
		let max_row = clamp(((self.origin_y() - envelope.min_y) / span_y).ceil() - 1.0);

		TileRange {
			min_column,
			min_row,
			max_column: max_column.max(min_column),
			max_row: max_row.max(min_row),
		}
	}
}

/// An inclusive rectangle of tile indices within one zoom level.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
	pub min_column: u32,
	pub min_row: u32,
	pub max_column: u32,
	pub max_row: u32,
}

impl TileRange {
	/// Number of tiles in the range, saturating at `u64::MAX`.
	#[must_use]
	pub fn count(&self) -> u64 {
		let columns = u64::from(self.max_column) - u64::from(self.min_column) + 1;
		let rows = u64::from(self.max_row) - u64::from(self.min_row) + 1;
		columns.saturating_mul(rows)
	}

	/// The position following `(row, column)` in row-major order, column fastest.
	#[must_use]
	pub fn next_after(&self, row: u32, column: u32) -> Option<(u32, u32)> {
		if column < self.max_column {
			Some((row, column + 1))
		} else if row < self.max_row {
			Some((row + 1, self.min_column))
		} else {
			None
		}
	}
}

impl Debug for TileRange {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"TileRange(rows {}..={}, columns {}..={})",
			self.min_row, self.max_row, self.min_column, self.max_column
		)
	}
}
