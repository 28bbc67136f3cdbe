use crate::Frame;
use anyhow::Result;

/// A single-pass walk over the frames of one query.
///
/// A new cursor is positioned before its first frame; each successful
/// [`move_to_next`](MosaicCursor::move_to_next) makes the next frame
/// [`current`](MosaicCursor::current). A cursor serves one thread at a time and cannot
/// be restarted.
pub trait MosaicCursor: Send {
	/// Advances to the next frame. `Ok(false)` once the results are exhausted or the
	/// cursor is closed.
	fn move_to_next(&mut self) -> Result<bool>;

	/// The frame at the current position.
	fn current(&self) -> Option<&Frame>;

	/// Releases the resources held by the cursor. Further calls do nothing.
	fn close(&mut self);
}

impl dyn MosaicCursor {
	/// Consumes the cursor as an iterator of frames.
	pub fn frames(self: Box<Self>) -> Frames {
		Frames { cursor: self }
	}
}

/// Iterator over the remaining frames of a cursor. Closes the cursor when dropped.
pub struct Frames {
	cursor: Box<dyn MosaicCursor>,
}

impl Iterator for Frames {
	type Item = Result<Frame>;

	fn next(&mut self) -> Option<Self::Item> {
		match self.cursor.move_to_next() {
			Ok(true) => self.cursor.current().cloned().map(Ok),
			Ok(false) => None,
			Err(e) => Some(Err(e)),
		}
	}
}

impl Drop for Frames {
	fn drop(&mut self) {
		self.cursor.close();
	}
}
