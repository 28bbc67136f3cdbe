//! Resolution tiers of a power-of-two tile pyramid.
//!
//! # Examples
//!
//! ```
//! use tilemosaic_core::{ZoomLevel, create_quadtree};
//!
//! let base = ZoomLevel::new(0, 100.0, 100.0, 100.0, 256, 256);
//! let levels = create_quadtree(&base, 3);
//! assert_eq!(levels[2].level, 2);
//! assert_eq!(levels[2].pixel_size_x, 25.0);
//! assert_eq!(levels[2].resolution, 25.0);
//! ```

/// One resolution tier of a pyramid.
///
/// `resolution` is the nominal ground sample distance in metres per pixel; pixel sizes
/// are in native SRID units. Finer levels have a higher `level` and a numerically
/// smaller `resolution`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomLevel {
	pub level: u8,
	pub resolution: f64,
	pub pixel_size_x: f64,
	pub pixel_size_y: f64,
	pub tile_width: u32,
	pub tile_height: u32,
}

impl ZoomLevel {
	#[must_use]
	pub fn new(
		level: u8,
		resolution: f64,
		pixel_size_x: f64,
		pixel_size_y: f64,
		tile_width: u32,
		tile_height: u32,
	) -> ZoomLevel {
		ZoomLevel {
			level,
			resolution,
			pixel_size_x,
			pixel_size_y,
			tile_width,
			tile_height,
		}
	}

	/// Ground extent of one tile in native units, `(width, height)`.
	#[must_use]
	pub fn tile_span(&self) -> (f64, f64) {
		(
			self.pixel_size_x * f64::from(self.tile_width),
			self.pixel_size_y * f64::from(self.tile_height),
		)
	}

	/// This level moved `steps` levels finer: pixel sizes and resolution divided by `2^steps`.
	#[must_use]
	pub fn finer_by(&self, steps: u8) -> ZoomLevel {
		let scale = f64::from(1u32 << steps);
		ZoomLevel {
			level: self.level + steps,
			resolution: self.resolution / scale,
			pixel_size_x: self.pixel_size_x / scale,
			pixel_size_y: self.pixel_size_y / scale,
			tile_width: self.tile_width,
			tile_height: self.tile_height,
		}
	}
}

/// Derives `count` ascending quadtree levels starting at `base`.
///
/// Level `i` of the result has pixel sizes and resolution of `base` divided by `2^i`;
/// tile dimensions are carried over unchanged.
///
/// # Panics
///
/// Panics if the pyramid would exceed level 31.
#[must_use]
pub fn create_quadtree(base: &ZoomLevel, count: usize) -> Vec<ZoomLevel> {
	assert!(
		usize::from(base.level) + count <= 32,
		"quadtree of {count} levels starting at {} exceeds level 31",
		base.level
	);
	(0..count).map(|i| base.finer_by(i as u8)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;
	use rstest::rstest;

	#[rstest]
	#[case(0, 1)]
	#[case(0, 5)]
	#[case(3, 12)]
	#[case(7, 20)]
	fn quadtree_halves_pixel_size(#[case] base_level: u8, #[case] count: usize) {
		let base = ZoomLevel::new(base_level, 156_543.03, 156_543.03, 78_271.5, 256, 512);
		let levels = create_quadtree(&base, count);
		assert_eq!(levels.len(), count);

		for (i, level) in levels.iter().enumerate() {
			let divisor = 2f64.powi(i as i32);
			assert_eq!(level.level, base_level + i as u8);
			assert_relative_eq!(level.pixel_size_x, 156_543.03 / divisor);
			assert_relative_eq!(level.pixel_size_y, 78_271.5 / divisor);
			assert_eq!((level.tile_width, level.tile_height), (256, 512));
		}

		for pair in levels.windows(2) {
			assert!(pair[1].resolution < pair[0].resolution);
		}
	}

	#[test]
	fn tile_span() {
		let level = ZoomLevel::new(2, 25.0, 25.0, 12.5, 4, 8);
		assert_eq!(level.tile_span(), (100.0, 100.0));
	}

	#[test]
	#[should_panic(expected = "exceeds level 31")]
	fn quadtree_rejects_too_many_levels() {
		let base = ZoomLevel::new(30, 1.0, 1.0, 1.0, 256, 256);
		let _ = create_quadtree(&base, 3);
	}
}
