//! Creates and opens [`MosaicDatabase`]s from the registered dataset types.

use super::{MosaicDatabase, MosaicDatabaseType, TileContainerMosaicDatabase};
use anyhow::Result;
use parking_lot::RwLock;
use std::path::Path;
use tilemosaic_container::{ActiveContainers, ContainerOptions};

/// Registry of dataset types, probed in descending priority when a file is opened.
pub struct MosaicDatabaseFactory {
	types: RwLock<Vec<MosaicDatabaseType>>,
	containers: ActiveContainers,
	options: ContainerOptions,
}

impl MosaicDatabaseFactory {
	/// An empty factory whose databases register containers with `containers`.
	pub fn new(containers: ActiveContainers, options: ContainerOptions) -> Self {
		MosaicDatabaseFactory {
			types: RwLock::new(Vec::new()),
			containers,
			options,
		}
	}

	/// Adds `database_type`, replacing a type of the same name.
	pub fn register_type(&self, database_type: MosaicDatabaseType) {
		log::debug!("register {database_type:?}");
		let mut types = self.types.write();
		types.retain(|t| t.name() != database_type.name());
		types.push(database_type);
		// stable: equal priorities keep registration order
		types.sort_by_key(|t| std::cmp::Reverse(t.priority()));
	}

	/// Removes the type called `name`. `false` if there was none.
	pub fn unregister_type(&self, name: &str) -> bool {
		let mut types = self.types.write();
		let before = types.len();
		types.retain(|t| t.name() != name);
		types.len() != before
	}

	/// Names of the registered types in probing order.
	pub fn type_names(&self) -> Vec<String> {
		self.types.read().iter().map(|t| t.name().to_string()).collect()
	}

	/// An unopened database of the type called `name`.
	pub fn create(&self, name: &str) -> Option<TileContainerMosaicDatabase> {
		let database_type = self.types.read().iter().find(|t| t.name() == name).cloned()?;
		Some(TileContainerMosaicDatabase::new(
			database_type,
			self.containers.clone(),
			self.options.clone(),
		))
	}

	/// Opens `path` with the first type that accepts it. `None` if no type does.
	pub fn open(&self, path: &Path) -> Result<Option<Box<dyn MosaicDatabase>>> {
		let types = self.types.read().clone();
		for database_type in types {
			let name = database_type.name().to_string();
			let database = TileContainerMosaicDatabase::new(database_type, self.containers.clone(), self.options.clone());
			if database.open(path)? {
				log::debug!("{path:?} opened as {name}");
				return Ok(Some(Box::new(database)));
			}
			log::trace!("{path:?} is not {name}");
		}
		log::debug!("no dataset type accepts {path:?}");
		Ok(None)
	}

	pub fn containers(&self) -> &ActiveContainers {
		&self.containers
	}

	pub fn options(&self) -> &ContainerOptions {
		&self.options
	}
}
