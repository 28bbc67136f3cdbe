//! Forward-only iteration over query results.

mod empty_cursor;
pub use empty_cursor::*;

mod multiplex_cursor;
pub use multiplex_cursor::*;

mod tile_container_cursor;
pub use tile_container_cursor::*;

mod traits;
pub use traits::*;
