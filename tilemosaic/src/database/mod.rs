//! Mosaic databases: queryable catalogues over opened datasets.

mod database_type;
pub use database_type::*;

mod factory;
pub use factory::*;

mod tile_container_database;
pub use tile_container_database::*;

mod traits;
pub use traits::*;
