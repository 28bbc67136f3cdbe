//! The `customtiles` format: a read-only tile pyramid in a single SQLite file.
//!
//! Two tables make up the format:
//!
//! - `customtiles(z, y, x, tile)` holds one blob per stored tile, where `y` is the row
//!   and `x` the column.
//! - `info(srid, origin_x, origin_y, min_x, min_y, max_x, max_y, tile_width,
//!   tile_height, pixel_size_x_z0, pixel_size_y_z0)` holds exactly one row describing
//!   the pyramid.
//!
//! Additional columns are ignored. A missing table or column, an empty `info` table or
//! an empty tile table all mean the file is not in this format.

mod container;
pub use container::*;

mod schema;
pub use schema::{INFO_COLUMNS, INFO_TABLE, TILE_COLUMNS, TILE_TABLE};
