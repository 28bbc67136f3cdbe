//! Core types for tiled raster pyramids: envelopes, zoom levels, tile matrices,
//! projections and the shared error taxonomy.
//!
//! Everything in this crate is free of I/O. Storage lives in `tilemosaic_container`,
//! the query engine in `tilemosaic`.

mod error;
pub use error::*;

pub mod projection;
pub use projection::{Projection, get_projection, transform_envelope};

pub mod types;
pub use types::*;
