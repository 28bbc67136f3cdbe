//! Resolving tile locators into pixels.

mod locator;
pub use locator::*;

mod resample;
pub use resample::*;

mod tile_reader;
pub use tile_reader::*;
