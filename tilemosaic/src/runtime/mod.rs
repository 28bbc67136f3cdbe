//! The runtime: one registry of open containers, the dataset types and the tile reader
//! settings, shared by every database opened through it.
//!
//! ```no_run
//! use tilemosaic::{MosaicRuntime, ResampleFilter};
//!
//! let runtime = MosaicRuntime::builder()
//! 	.pool_size(8)
//! 	.resample_filter(ResampleFilter::Lanczos3)
//! 	.build()
//! 	.unwrap();
//! ```

mod builder;
mod inner;
mod outer;

pub use builder::RuntimeBuilder;
pub(crate) use inner::RuntimeInner;
pub use outer::MosaicRuntime;
