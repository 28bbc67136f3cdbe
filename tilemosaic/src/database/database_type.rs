use std::{fmt::Debug, path::Path, sync::Arc};
use tilemosaic_container::{CUSTOMTILES, ContainerOptions, CustomTilesContainer, TileContainer};

/// Opens a file as a tile container, `None` if the file is not of this type.
pub type ContainerOpener = fn(&Path, &ContainerOptions) -> Option<Arc<dyn TileContainer>>;

/// A pluggable dataset type: a name, a probing priority and a way to open files.
#[derive(Clone)]
pub struct MosaicDatabaseType {
	name: String,
	priority: i32,
	opener: ContainerOpener,
}

impl MosaicDatabaseType {
	pub fn new(name: &str, priority: i32, opener: ContainerOpener) -> Self {
		MosaicDatabaseType {
			name: name.to_string(),
			priority,
			opener,
		}
	}

	/// The SQLite `customtiles` format.
	pub fn customtiles() -> Self {
		Self::new(CUSTOMTILES, 0, |path, options| {
			CustomTilesContainer::open(path, options).map(|c| Arc::new(c) as Arc<dyn TileContainer>)
		})
	}

	/// A built-in type by name.
	pub fn builtin(name: &str) -> Option<Self> {
		match name {
			CUSTOMTILES => Some(Self::customtiles()),
			_ => None,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn priority(&self) -> i32 {
		self.priority
	}

	pub fn with_priority(mut self, priority: i32) -> Self {
		self.priority = priority;
		self
	}

	pub(crate) fn open_container(&self, path: &Path, options: &ContainerOptions) -> Option<Arc<dyn TileContainer>> {
		(self.opener)(path, options)
	}
}

impl Debug for MosaicDatabaseType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "MosaicDatabaseType({}, priority {})", self.name, self.priority)
	}
}
