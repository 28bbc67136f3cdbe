use super::active_containers::EntryMap;
use crate::TileContainer;
use parking_lot::Mutex;
use std::{fmt::Debug, ops::Deref, sync::Arc};
use uuid::Uuid;

/// One registry entry: the container and the number of live references to it.
pub(super) struct RefEntry {
	id: Uuid,
	value: Arc<dyn TileContainer>,
	count: Mutex<usize>,
}

impl RefEntry {
	pub(super) fn new(id: Uuid, value: Arc<dyn TileContainer>) -> RefEntry {
		RefEntry {
			id,
			value,
			count: Mutex::new(1),
		}
	}

	pub(super) fn increment(&self) -> usize {
		let mut count = self.count.lock();
		*count += 1;
		*count
	}
}

/// A counted reference to a registered container.
///
/// `clone` takes another reference and dropping releases one. When the last reference is
/// released the container leaves its registry and is disposed, so a holder can never
/// observe a disposed container.
pub struct ContainerRef {
	entry: Arc<RefEntry>,
	registry: Arc<Mutex<EntryMap>>,
}

impl ContainerRef {
	pub(super) fn from_entry(entry: Arc<RefEntry>, registry: Arc<Mutex<EntryMap>>) -> ContainerRef {
		ContainerRef { entry, registry }
	}

	pub fn id(&self) -> Uuid {
		self.entry.id
	}

	/// The container, borrowed for as long as this reference lives.
	pub fn value(&self) -> &(dyn TileContainer + 'static) {
		self.entry.value.as_ref()
	}

	/// Number of live references, including this one.
	pub fn ref_count(&self) -> usize {
		*self.entry.count.lock()
	}

	/// Explicit form of `clone`.
	#[must_use]
	pub fn reference(&self) -> ContainerRef {
		self.clone()
	}

	/// Explicit form of `drop`.
	pub fn dereference(self) {}
}

impl Clone for ContainerRef {
	fn clone(&self) -> Self {
		let count = self.entry.increment();
		log::trace!("reference container {}: {count}", self.entry.id);
		ContainerRef {
			entry: Arc::clone(&self.entry),
			registry: Arc::clone(&self.registry),
		}
	}
}

impl Drop for ContainerRef {
	fn drop(&mut self) {
		let released = {
			let mut registry = self.registry.lock();
			let mut count = self.entry.count.lock();
			assert!(*count > 0, "container {} dereferenced past zero", self.entry.id);
			*count -= 1;
			log::trace!("dereference container {}: {}", self.entry.id, *count);
			if *count == 0 {
				registry.remove(&self.entry.id);
				true
			} else {
				false
			}
		};

		if released {
			log::debug!("release container {}", self.entry.id);
			self.entry.value.dispose();
		}
	}
}

impl Deref for ContainerRef {
	type Target = dyn TileContainer;

	fn deref(&self) -> &Self::Target {
		self.value()
	}
}

impl Debug for ContainerRef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "ContainerRef({}, refs: {})", self.entry.id, self.ref_count())
	}
}
