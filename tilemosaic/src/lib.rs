//! Spatial mosaic queries over read-only tile pyramids.
//!
//! A [`MosaicRuntime`] owns the registry of open containers and the ordered list of
//! dataset types. [`MosaicRuntime::open_database`] turns a file into a
//! [`MosaicDatabase`], whose [`query`](MosaicDatabase::query) returns a
//! [`MosaicCursor`] over every stored tile matching a [`QueryParameters`] filter. Frames
//! arrive finest resolution first, so a consumer painting them in order can let coarse
//! tiles fill only the ground that finer ones left uncovered.
//!
//! Each [`Frame`] carries a `tiles://` locator. The locator is a plain string, and
//! [`MosaicRuntime::tile_reader`] resolves it back to the container for as long as the
//! container stays open.

mod config;
pub use config::*;

mod cursor;
pub use cursor::*;

mod database;
pub use database::*;

pub mod dataset;
pub use dataset::DatasetDescriptor;

mod runtime;
pub use runtime::*;

mod types;
pub use types::*;

pub use tilemosaic_container::{ResampleFilter, TileLocator, TileReaderAdapter};
pub use tilemosaic_core::{Envelope, GeoPoint, MosaicError};
