//! Tile containers: persisted tile pyramids behind a uniform, read-only interface.
//!
//! - [`TileContainer`] is the handle to one opened pyramid; [`CustomTilesContainer`]
//!   implements it for the SQLite `customtiles` format.
//! - [`ActiveContainers`] keeps every open container reachable by id, and
//!   [`ContainerRef`] counts the consumers sharing it. The last released reference
//!   disposes the container.
//! - [`TileLocator`] is the plain-string address of one tile, and
//!   [`TileReaderAdapter`] turns such a string back into pixels.
//!
//! # Features
//! - `test`: fixture builders for writing `customtiles` stores in downstream tests.

mod container;
pub use container::*;

mod reader;
pub use reader::*;

mod registry;
pub use registry::*;

#[cfg(any(test, feature = "test"))]
pub mod testing;
