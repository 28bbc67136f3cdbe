//! Error taxonomy shared by containers, readers and the mosaic engine.
//!
//! Functions return `anyhow::Result`; a [`MosaicError`] travels inside the
//! `anyhow::Error` so callers can classify a failure with
//! [`MosaicError::classify`] or `error.downcast_ref::<MosaicError>()`.
//!
//! Schema mismatches and missing tiles are expected control flow. They are reported
//! as `None`/`false` on the probe, open and lookup paths and only appear as an error
//! where a caller explicitly asked for something that must exist.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MosaicError {
	/// The store is readable but is not this format.
	#[error("schema mismatch: {0}")]
	SchemaMismatch(String),

	/// A tile or container is absent.
	#[error("not found: {0}")]
	NotFound(String),

	/// The storage layer failed.
	#[error("I/O failure: {0}")]
	Io(String),

	/// A mutation was attempted on a read-only container.
	#[error("unsupported operation: {0}")]
	UnsupportedOperation(String),

	/// A stored tile blob could not be decoded as an image.
	#[error("decode error: {0}")]
	Decode(String),

	/// The object is not in a state that allows the call.
	#[error("invalid state: {0}")]
	InvalidState(String),

	#[error("unsupported SRID {0}")]
	UnsupportedSrid(i32),
}

impl MosaicError {
	/// Returns the `MosaicError` carried by an `anyhow::Error`, if any.
	///
	/// Finds it whether it was the original error, a context layer, or a source further
	/// down the chain.
	pub fn classify(error: &anyhow::Error) -> Option<&MosaicError> {
		error
			.downcast_ref::<MosaicError>()
			.or_else(|| error.chain().find_map(|cause| cause.downcast_ref::<MosaicError>()))
	}
}
