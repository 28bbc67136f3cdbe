//! Value types shared by containers and the mosaic engine: envelopes, points, blobs and
//! the tile-matrix model.

mod blob;
pub use blob::*;

mod envelope;
pub use envelope::*;

mod geo_point;
pub use geo_point::*;

mod tile_matrix;
pub use tile_matrix::*;

mod zoom_level;
pub use zoom_level::*;
