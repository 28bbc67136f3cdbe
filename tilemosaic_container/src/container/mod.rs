//! The [`TileContainer`] trait and its implementations.

mod customtiles;
pub use customtiles::*;

mod options;
pub use options::*;

mod traits;
pub use traits::*;
