use anyhow::{Context, Result, anyhow, ensure};
use r2d2_sqlite::rusqlite::{Connection, OptionalExtension};
use tilemosaic_core::{Envelope, MosaicError};

pub const TILE_TABLE: &str = "customtiles";
pub const TILE_COLUMNS: [&str; 4] = ["z", "y", "x", "tile"];

pub const INFO_TABLE: &str = "info";
pub const INFO_COLUMNS: [&str; 11] = [
	"srid",
	"origin_x",
	"origin_y",
	"min_x",
	"min_y",
	"max_x",
	"max_y",
	"tile_width",
	"tile_height",
	"pixel_size_x_z0",
	"pixel_size_y_z0",
];

fn mismatch(message: String) -> anyhow::Error {
	anyhow!(MosaicError::SchemaMismatch(message))
}

/// Verifies that both tables exist with all required columns.
pub(super) fn check_schema(conn: &Connection) -> Result<()> {
	for (table, required) in [(TILE_TABLE, &TILE_COLUMNS[..]), (INFO_TABLE, &INFO_COLUMNS[..])] {
		let mut stmt = conn
			.prepare(&format!("PRAGMA table_info({table})"))
			.map_err(|e| mismatch(format!("not a readable SQLite database: {e}")))?;
		let columns = stmt
			.query_map([], |row| row.get::<_, String>(1))
			.and_then(|rows| rows.collect::<Result<Vec<String>, _>>())
			.map_err(|e| mismatch(format!("not a readable SQLite database: {e}")))?;

		if columns.is_empty() {
			return Err(mismatch(format!("table '{table}' is missing")));
		}

		let missing = required
			.iter()
			.filter(|name| !columns.iter().any(|c| c.eq_ignore_ascii_case(name)))
			.copied()
			.collect::<Vec<_>>();
		if !missing.is_empty() {
			return Err(mismatch(format!(
				"table '{table}' lacks column(s) {}",
				missing.join(", ")
			)));
		}
	}
	Ok(())
}

/// The single row of the `info` table.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct InfoRecord {
	pub srid: i32,
	pub origin_x: f64,
	pub origin_y: f64,
	pub bounds: Envelope,
	pub tile_width: u32,
	pub tile_height: u32,
	pub pixel_size_x: f64,
	pub pixel_size_y: f64,
}

pub(super) fn read_info(conn: &Connection) -> Result<InfoRecord> {
	let sql = format!("SELECT {} FROM {INFO_TABLE} LIMIT 1", INFO_COLUMNS.join(", "));
	log::trace!("SQL: {sql}");

	let row = conn
		.query_row(&sql, [], |row| {
			Ok((
				row.get::<_, i32>(0)?,
				[row.get::<_, f64>(1)?, row.get::<_, f64>(2)?],
				[
					row.get::<_, f64>(3)?,
					row.get::<_, f64>(4)?,
					row.get::<_, f64>(5)?,
					row.get::<_, f64>(6)?,
				],
				[row.get::<_, u32>(7)?, row.get::<_, u32>(8)?],
				[row.get::<_, f64>(9)?, row.get::<_, f64>(10)?],
			))
		})
		.optional()
		.map_err(|e| mismatch(format!("unreadable info record: {e}")))?;

	let Some((srid, [origin_x, origin_y], [min_x, min_y, max_x, max_y], [tile_width, tile_height], [pixel_size_x, pixel_size_y])) = row
	else {
		return Err(mismatch(format!("table '{INFO_TABLE}' is empty")));
	};

	let bounds = Envelope::new(min_x, min_y, max_x, max_y)
		.context("invalid bounds")
		.map_err(|e| mismatch(format!("{e:#}")))?;

	let validate = || -> Result<()> {
		ensure!(tile_width > 0 && tile_height > 0, "tile dimensions must be positive");
		ensure!(
			pixel_size_x.is_finite() && pixel_size_x > 0.0 && pixel_size_y.is_finite() && pixel_size_y > 0.0,
			"pixel sizes must be positive"
		);
		ensure!(origin_x.is_finite() && origin_y.is_finite(), "origin must be finite");
		Ok(())
	};
	validate().map_err(|e| mismatch(e.to_string()))?;

	Ok(InfoRecord {
		srid,
		origin_x,
		origin_y,
		bounds,
		tile_width,
		tile_height,
		pixel_size_x,
		pixel_size_y,
	})
}

/// Smallest and largest stored zoom level.
pub(super) fn read_zoom_range(conn: &Connection) -> Result<(u8, u8)> {
	let sql = format!("SELECT MIN(z), MAX(z) FROM {TILE_TABLE}");
	log::trace!("SQL: {sql}");

	let (min, max) = conn
		.query_row(&sql, [], |row| {
			Ok((row.get::<_, Option<i64>>(0)?, row.get::<_, Option<i64>>(1)?))
		})
		.map_err(|e| mismatch(format!("unreadable tile table: {e}")))?;

	let (Some(min), Some(max)) = (min, max) else {
		return Err(mismatch(format!("table '{TILE_TABLE}' holds no tiles")));
	};
	if !(0..=31).contains(&min) || !(0..=31).contains(&max) {
		return Err(mismatch(format!("zoom levels {min}..={max} are outside 0..=31")));
	}
	Ok((min as u8, max as u8))
}
