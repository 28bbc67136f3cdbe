use super::container_ref::{ContainerRef, RefEntry};
use crate::TileContainer;
use parking_lot::Mutex;
use std::{collections::HashMap, fmt::Debug, sync::Arc};
use uuid::Uuid;

pub(super) type EntryMap = HashMap<Uuid, Arc<RefEntry>>;

/// The set of currently open containers, keyed by id.
///
/// Cloning yields another handle to the same set. Independent sets can coexist, so each
/// runtime or test owns its own.
#[derive(Clone, Default)]
pub struct ActiveContainers {
	entries: Arc<Mutex<EntryMap>>,
}

impl ActiveContainers {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `container` under a fresh id and returns its first reference.
	pub fn register(&self, container: Arc<dyn TileContainer>) -> ContainerRef {
		let id = Uuid::new_v4();
		let entry = Arc::new(RefEntry::new(id, container));
		self.entries.lock().insert(id, Arc::clone(&entry));
		log::debug!("register container {id}");
		ContainerRef::from_entry(entry, Arc::clone(&self.entries))
	}

	/// A new counted reference to the container with `id`, or `None` once it has been
	/// released by all holders.
	pub fn find(&self, id: &Uuid) -> Option<ContainerRef> {
		let entries = self.entries.lock();
		let entry = entries.get(id)?;
		entry.increment();
		Some(ContainerRef::from_entry(Arc::clone(entry), Arc::clone(&self.entries)))
	}

	pub fn contains(&self, id: &Uuid) -> bool {
		self.entries.lock().contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}

	pub fn ids(&self) -> Vec<Uuid> {
		self.entries.lock().keys().copied().collect()
	}
}

impl Debug for ActiveContainers {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "ActiveContainers({} open)", self.len())
	}
}
