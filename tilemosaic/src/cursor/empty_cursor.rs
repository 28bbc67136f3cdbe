use super::MosaicCursor;
use crate::Frame;
use anyhow::Result;

/// The result of a query that cannot match anything.
#[derive(Debug, Default)]
pub struct EmptyCursor;

impl MosaicCursor for EmptyCursor {
	fn move_to_next(&mut self) -> Result<bool> {
		Ok(false)
	}

	fn current(&self) -> Option<&Frame> {
		None
	}

	fn close(&mut self) {}
}
