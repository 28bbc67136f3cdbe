use crate::{Coverage, MosaicCursor, QueryParameters};
use anyhow::Result;
use std::{collections::HashMap, path::Path};

/// A catalogue answering spatial and resolution queries over one opened dataset.
///
/// The lifecycle is `unopened → opened → closed`. A failed [`open`](MosaicDatabase::open)
/// leaves the database unopened so callers can probe several database types in turn.
pub trait MosaicDatabase: Send + Sync {
	/// Name of the dataset type this database reads.
	fn database_type(&self) -> &str;

	/// Opens `path`. `Ok(false)` if the file is not of this database's type.
	///
	/// Fails with an invalid-state error if the database was already opened or closed.
	fn open(&self, path: &Path) -> Result<bool>;

	fn is_open(&self) -> bool;

	/// Releases the dataset. Cursors created before keep working until they are closed.
	fn close(&self);

	/// Extent of the opened dataset, `None` unless open.
	fn coverage(&self) -> Option<Coverage>;

	/// Coverage per dataset type.
	fn coverages(&self) -> HashMap<String, Coverage>;

	/// The coverage for `dataset_type`, or for any type when `None`.
	fn coverage_for(&self, dataset_type: Option<&str>) -> Option<Coverage>;

	/// Starts a query. Fails with an invalid-state error unless open.
	fn query(&self, params: &QueryParameters) -> Result<Box<dyn MosaicCursor>>;
}
