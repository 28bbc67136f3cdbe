use super::MosaicCursor;
use crate::Frame;
use anyhow::Result;
use std::collections::HashSet;

/// Merges several cursors into one finest-first stream.
///
/// Each source must itself be ordered finest-first. At every step the pending frame with
/// the smallest GSD is emitted, ties going to the earlier source. A locator already
/// emitted is not emitted again, so overlapping sub-queries can be combined freely.
/// Duplicates share a GSD, so only the locators of the current level are remembered.
pub struct MultiplexCursor {
	sources: Vec<Box<dyn MosaicCursor>>,
	heads: Vec<Option<Frame>>,
	started: bool,
	last: Option<usize>,
	level_gsd: Option<f64>,
	seen: HashSet<String>,
	closed: bool,
}

impl MultiplexCursor {
	pub fn new(sources: Vec<Box<dyn MosaicCursor>>) -> MultiplexCursor {
		let heads = vec![None; sources.len()];
		MultiplexCursor {
			sources,
			heads,
			started: false,
			last: None,
			level_gsd: None,
			seen: HashSet::new(),
			closed: false,
		}
	}

	fn advance(&mut self, index: usize) -> Result<()> {
		let source = &mut self.sources[index];
		self.heads[index] = if source.move_to_next()? {
			source.current().cloned()
		} else {
			None
		};
		Ok(())
	}

	fn finest_head(&self) -> Option<usize> {
		let mut best: Option<(usize, f64)> = None;
		for (index, frame) in self.heads.iter().enumerate() {
			let Some(frame) = frame else { continue };
			if best.is_none_or(|(_, gsd)| frame.min_gsd() < gsd) {
				best = Some((index, frame.min_gsd()));
			}
		}
		best.map(|(index, _)| index)
	}
}

impl MosaicCursor for MultiplexCursor {
	fn move_to_next(&mut self) -> Result<bool> {
		if self.closed {
			return Ok(false);
		}

		if self.started {
			if let Some(index) = self.last.take() {
				self.advance(index)?;
			}
		} else {
			for index in 0..self.sources.len() {
				self.advance(index)?;
			}
			self.started = true;
		}

		while let Some(index) = self.finest_head() {
			let Some(frame) = self.heads[index].as_ref() else { break };
			let gsd = frame.min_gsd();
			if self.level_gsd.is_none_or(|level| gsd > level) {
				self.seen.clear();
				self.level_gsd = Some(gsd);
			}
			if self.seen.insert(frame.path()) {
				self.last = Some(index);
				return Ok(true);
			}
			self.advance(index)?;
		}

		Ok(false)
	}

	fn current(&self) -> Option<&Frame> {
		self.heads[self.last?].as_ref()
	}

	fn close(&mut self) {
		if !self.closed {
			for source in &mut self.sources {
				source.close();
			}
			self.heads.iter_mut().for_each(|head| *head = None);
			self.last = None;
			self.closed = true;
		}
	}
}
