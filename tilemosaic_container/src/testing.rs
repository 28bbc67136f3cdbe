//! Fixtures for tests that need `customtiles` stores on disk.
//!
//! Compiled for this crate's own tests and, with the `test` feature, for downstream
//! crates.
//!
//! ```
//! use tilemosaic_container::testing::{CustomTilesFixture, solid_png};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("pyramid.sqlite");
//! CustomTilesFixture::new()
//! 	.tile(0, 0, 0, solid_png(1, 1, [255, 0, 0, 255]))
//! 	.write(&path)
//! 	.unwrap();
//! ```

use crate::{INFO_COLUMNS, INFO_TABLE, TILE_TABLE};
use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};
use r2d2_sqlite::rusqlite::{Connection, params, params_from_iter, types::Value};
use std::{collections::BTreeMap, io::Cursor, path::Path};

/// Builder for a `customtiles` store.
///
/// The defaults describe a small Web Mercator grid: SRID 3857, origin `(0, 100)`, bounds
/// `(0, 0, 100, 100)`, 1×1 pixel tiles and a zoom-0 pixel size of 100, so zoom level `z`
/// has resolution `100 / 2^z` and `2^z × 2^z` tiles cover the bounds.
#[derive(Clone, Debug)]
pub struct CustomTilesFixture {
	srid: i32,
	origin: (f64, f64),
	bounds: (f64, f64, f64, f64),
	tile_size: (u32, u32),
	pixel_size: (f64, f64),
	tiles: BTreeMap<(u8, u32, u32), Vec<u8>>,
	omitted_info_columns: Vec<&'static str>,
	extra_columns: bool,
	info_row: bool,
}

impl Default for CustomTilesFixture {
	fn default() -> Self {
		CustomTilesFixture {
			srid: 3857,
			origin: (0.0, 100.0),
			bounds: (0.0, 0.0, 100.0, 100.0),
			tile_size: (1, 1),
			pixel_size: (100.0, 100.0),
			tiles: BTreeMap::new(),
			omitted_info_columns: Vec::new(),
			extra_columns: false,
			info_row: true,
		}
	}
}

impl CustomTilesFixture {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn srid(mut self, srid: i32) -> Self {
		self.srid = srid;
		self
	}

	pub fn origin(mut self, x: f64, y: f64) -> Self {
		self.origin = (x, y);
		self
	}

	pub fn bounds(mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
		self.bounds = (min_x, min_y, max_x, max_y);
		self
	}

	pub fn tile_size(mut self, width: u32, height: u32) -> Self {
		self.tile_size = (width, height);
		self
	}

	/// Pixel size at zoom level 0.
	pub fn pixel_size(mut self, x: f64, y: f64) -> Self {
		self.pixel_size = (x, y);
		self
	}

	/// Adds one tile. Note the `(zoom, row, column)` order of the stored key.
	pub fn tile(mut self, zoom: u8, row: u32, column: u32, data: impl Into<Vec<u8>>) -> Self {
		self.tiles.insert((zoom, row, column), data.into());
		self
	}

	/// Adds every tile of a `rows × columns` block at `zoom`, each a PNG of the configured
	/// tile size whose colour encodes its key.
	pub fn fill_level(mut self, zoom: u8, rows: u32, columns: u32) -> Self {
		let (width, height) = self.tile_size;
		for row in 0..rows {
			for column in 0..columns {
				let colour = [zoom, row as u8, column as u8, 255];
				self.tiles.insert((zoom, row, column), solid_png(width, height, colour));
			}
		}
		self
	}

	/// Drops a required column from the `info` table.
	pub fn without_info_column(mut self, column: &'static str) -> Self {
		self.omitted_info_columns.push(column);
		self
	}

	/// Leaves the `info` table empty.
	pub fn without_info_row(mut self) -> Self {
		self.info_row = false;
		self
	}

	/// Adds unrelated columns to both tables.
	pub fn with_extra_columns(mut self) -> Self {
		self.extra_columns = true;
		self
	}

	/// Writes the store to `path`, which must not exist yet.
	pub fn write(&self, path: &Path) -> Result<()> {
		log::debug!("write customtiles fixture {path:?} with {} tiles", self.tiles.len());

		let mut conn = Connection::open(path).with_context(|| format!("creating {path:?}"))?;

		let extra = if self.extra_columns { ", comment TEXT" } else { "" };
		conn.execute_batch(&format!(
			"CREATE TABLE {TILE_TABLE} (z INTEGER NOT NULL, y INTEGER NOT NULL, x INTEGER NOT NULL, tile BLOB NOT NULL{extra}, PRIMARY KEY (z, y, x));"
		))?;

		let (min_x, min_y, max_x, max_y) = self.bounds;
		let columns = INFO_COLUMNS
			.iter()
			.copied()
			.zip([
				Value::Integer(i64::from(self.srid)),
				Value::Real(self.origin.0),
				Value::Real(self.origin.1),
				Value::Real(min_x),
				Value::Real(min_y),
				Value::Real(max_x),
				Value::Real(max_y),
				Value::Integer(i64::from(self.tile_size.0)),
				Value::Integer(i64::from(self.tile_size.1)),
				Value::Real(self.pixel_size.0),
				Value::Real(self.pixel_size.1),
			])
			.filter(|(name, _)| !self.omitted_info_columns.contains(name))
			.collect::<Vec<_>>();

		let definitions = columns
			.iter()
			.map(|(name, value)| match value {
				Value::Integer(_) => format!("{name} INTEGER"),
				_ => format!("{name} REAL"),
			})
			.collect::<Vec<_>>();
		conn.execute_batch(&format!("CREATE TABLE {INFO_TABLE} ({}{extra});", definitions.join(", ")))?;

		if self.info_row {
			let names = columns.iter().map(|(name, _)| *name).collect::<Vec<_>>();
			let placeholders = vec!["?"; names.len()].join(", ");
			conn.execute(
				&format!("INSERT INTO {INFO_TABLE} ({}) VALUES ({placeholders})", names.join(", ")),
				params_from_iter(columns.iter().map(|(_, value)| value)),
			)?;
		}

		let transaction = conn.transaction()?;
		{
			let mut stmt = transaction.prepare(&format!("INSERT INTO {TILE_TABLE} (z, y, x, tile) VALUES (?1, ?2, ?3, ?4)"))?;
			for ((zoom, row, column), data) in &self.tiles {
				stmt.execute(params![zoom, row, column, data])?;
			}
		}
		transaction.commit()?;

		Ok(())
	}
}

/// A PNG of one flat colour.
#[must_use]
pub fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
	encode_png(RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
}

/// A PNG whose pixel `(x, y)` has the colour `[x, y, 0, 255]`.
#[must_use]
pub fn coordinate_png(width: u32, height: u32) -> Vec<u8> {
	encode_png(RgbaImage::from_fn(width, height, |x, y| image::Rgba([x as u8, y as u8, 0, 255])))
}

fn encode_png(image: RgbaImage) -> Vec<u8> {
	let mut buffer = Cursor::new(Vec::new());
	DynamicImage::ImageRgba8(image)
		.write_to(&mut buffer, ImageFormat::Png)
		.expect("encode PNG");
	buffer.into_inner()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn coordinate_png_encodes_positions() {
		let image = image::load_from_memory(&coordinate_png(3, 2)).unwrap().to_rgba8();
		assert_eq!(image.dimensions(), (3, 2));
		assert_eq!(image.get_pixel(2, 1).0, [2, 1, 0, 255]);
	}

	#[test]
	fn writes_every_tile() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("store.sqlite");
		CustomTilesFixture::new().fill_level(1, 2, 2).tile(0, 0, 0, b"x").write(&path).unwrap();

		let conn = Connection::open(&path).unwrap();
		let count: i64 = conn
			.query_row("SELECT COUNT(*) FROM customtiles", [], |row| row.get(0))
			.unwrap();
		assert_eq!(count, 5);
	}
}
