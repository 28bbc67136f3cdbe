//! A [`MosaicDatabase`] over one registered tile container.
//!
//! Opening registers the container with the runtime's [`ActiveContainers`] and computes
//! its WGS 84 coverage. A query narrows the container's zoom levels to the requested
//! resolution band, intersects the spatial filter with the coverage, projects the result
//! back into the container's SRID and walks the matching tiles with a
//! [`TileContainerCursor`]. Filters crossing the antimeridian become one cursor per side,
//! merged by a [`MultiplexCursor`].

use super::{MosaicDatabase, MosaicDatabaseType};
use crate::{Coverage, EmptyCursor, MosaicCursor, MultiplexCursor, QueryParameters, TileContainerCursor};
use anyhow::{Result, bail};
use geo::{Geometry, Intersects};
use parking_lot::RwLock;
use std::{collections::HashMap, path::Path, sync::Arc};
use tilemosaic_container::{ActiveContainers, ContainerOptions, ContainerRef};
use tilemosaic_core::{Envelope, MosaicError, Projection, SRID_WGS84, get_projection, transform_envelope};

enum DatabaseState {
	Unopened,
	Opened(Box<OpenedDatabase>),
	Closed,
}

struct OpenedDatabase {
	container: ContainerRef,
	coverage: Coverage,
	native: Arc<dyn Projection>,
	geographic: Arc<dyn Projection>,
}

pub struct TileContainerMosaicDatabase {
	database_type: MosaicDatabaseType,
	containers: ActiveContainers,
	options: ContainerOptions,
	state: RwLock<DatabaseState>,
}

impl TileContainerMosaicDatabase {
	pub fn new(database_type: MosaicDatabaseType, containers: ActiveContainers, options: ContainerOptions) -> Self {
		TileContainerMosaicDatabase {
			database_type,
			containers,
			options,
			state: RwLock::new(DatabaseState::Unopened),
		}
	}

	/// A new reference to the opened container.
	pub fn container(&self) -> Option<ContainerRef> {
		match &*self.state.read() {
			DatabaseState::Opened(opened) => Some(opened.container.reference()),
			_ => None,
		}
	}

	fn compute_coverage(
		container: &ContainerRef,
		native: &dyn Projection,
		geographic: &dyn Projection,
	) -> Result<Coverage> {
		let envelope = transform_envelope(&container.bounds(), native, geographic)?;

		let resolutions = container.zoom_levels().iter().map(|level| level.resolution);
		let min_gsd = resolutions.clone().fold(f64::INFINITY, f64::min);
		let max_gsd = resolutions.fold(f64::NEG_INFINITY, f64::max);

		Ok(Coverage::new(envelope, min_gsd, max_gsd))
	}
}

/// Narrows `0..levels.len()` to the indices whose resolution lies within
/// `min_gsd..=max_gsd`. `None` if no level qualifies.
///
/// `resolutions` is ordered coarsest first.
fn narrow_zoom_indices(resolutions: &[f64], min_gsd: Option<f64>, max_gsd: Option<f64>) -> Option<(usize, usize)> {
	let mut low = 0;
	let mut high = resolutions.len().checked_sub(1)?;

	if let Some(min_gsd) = min_gsd {
		while high > low && resolutions[high] < min_gsd {
			high -= 1;
		}
		if resolutions[high] < min_gsd {
			return None;
		}
	}

	if let Some(max_gsd) = max_gsd {
		while low < high && resolutions[low] > max_gsd {
			low += 1;
		}
		if resolutions[low] > max_gsd {
			return None;
		}
	}

	(low <= high).then_some((low, high))
}

impl OpenedDatabase {
	fn query(&self, params: &QueryParameters) -> Result<Box<dyn MosaicCursor>> {
		let container = &self.container;
		let empty = || -> Result<Box<dyn MosaicCursor>> { Ok(Box::new(EmptyCursor)) };

		if params.precision_imagery == Some(true) {
			log::debug!("query for precision imagery: no results");
			return empty();
		}
		if params.srid.is_some_and(|srid| srid != container.srid()) {
			log::debug!("query for SRID {:?}: no results", params.srid);
			return empty();
		}
		if params
			.types
			.as_ref()
			.is_some_and(|types| !types.contains(container.name()))
		{
			log::debug!("query for types {:?}: no results", params.types);
			return empty();
		}

		if params.min_gsd.is_some_and(|gsd| gsd > self.coverage.max_gsd())
			|| params.max_gsd.is_some_and(|gsd| gsd < self.coverage.min_gsd())
		{
			log::debug!(
				"query for gsd {:?}..={:?} outside {:?}: no results",
				params.min_gsd,
				params.max_gsd,
				self.coverage
			);
			return empty();
		}

		let resolutions = container
			.zoom_levels()
			.iter()
			.map(|level| level.resolution)
			.collect::<Vec<_>>();
		let Some((low, high)) = narrow_zoom_indices(&resolutions, params.min_gsd, params.max_gsd) else {
			log::debug!(
				"no zoom level within gsd {:?}..={:?}",
				params.min_gsd,
				params.max_gsd
			);
			return empty();
		};
		log::debug!("query zoom indices {low}..={high}");

		if params
			.spatial_filter
			.as_ref()
			.is_some_and(|filter| !self.may_intersect(filter))
		{
			log::debug!("spatial filter misses {:?}: no results", self.coverage);
			return empty();
		}

		let bounds = match params.spatial_envelopes() {
			None => vec![container.bounds()],
			Some(envelopes) => self.native_query_bounds(&envelopes)?,
		};

		let mut cursors = bounds
			.into_iter()
			.map(|bounds| {
				Box::new(TileContainerCursor::new(
					container.reference(),
					Arc::clone(&self.native),
					bounds,
					low,
					high,
				)) as Box<dyn MosaicCursor>
			})
			.collect::<Vec<_>>();

		Ok(match cursors.len() {
			0 => {
				log::debug!("spatial filter misses {:?}: no results", self.coverage);
				Box::new(EmptyCursor)
			}
			1 => cursors.remove(0),
			_ => Box::new(MultiplexCursor::new(cursors)),
		})
	}

	/// Whether `filter` can touch the coverage. Only filters inside `[-180, 180]` are
	/// tested exactly; wrapping filters are left to the split boxes.
	fn may_intersect(&self, filter: &Geometry<f64>) -> bool {
		let wraps = Envelope::of_geometry(filter).is_some_and(|e| e.min_x < -180.0 || e.max_x > 180.0);
		wraps || filter.intersects(&self.coverage.geometry())
	}

	/// Intersects geographic filter boxes with the coverage and projects the overlaps into
	/// the container's SRID.
	fn native_query_bounds(&self, envelopes: &[Envelope]) -> Result<Vec<Envelope>> {
		let native_bounds = self.container.bounds();
		let mut bounds = Vec::new();
		for envelope in envelopes {
			let Some(overlap) = envelope.intersection(self.coverage.envelope()) else {
				continue;
			};
			let native = transform_envelope(&overlap, self.geographic.as_ref(), self.native.as_ref())?;
			bounds.push(native.intersection(&native_bounds).unwrap_or(native));
		}
		Ok(bounds)
	}
}

impl MosaicDatabase for TileContainerMosaicDatabase {
	fn database_type(&self) -> &str {
		self.database_type.name()
	}

	fn open(&self, path: &Path) -> Result<bool> {
		let mut state = self.state.write();
		match &*state {
			DatabaseState::Unopened => {}
			DatabaseState::Opened(_) => bail!(MosaicError::InvalidState("database is already open".into())),
			DatabaseState::Closed => bail!(MosaicError::InvalidState("database is closed".into())),
		}

		let Some(container) = self.database_type.open_container(path, &self.options) else {
			return Ok(false);
		};
		let container = self.containers.register(container);

		let projections = get_projection(container.srid()).and_then(|native| Ok((native, get_projection(SRID_WGS84)?)));
		let opened = projections.and_then(|(native, geographic)| {
			let coverage = Self::compute_coverage(&container, native.as_ref(), geographic.as_ref())?;
			Ok((native, geographic, coverage))
		});

		match opened {
			Ok((native, geographic, coverage)) => {
				log::debug!("opened {path:?} as {} with {coverage:?}", self.database_type());
				*state = DatabaseState::Opened(Box::new(OpenedDatabase {
					container,
					coverage,
					native,
					geographic,
				}));
				Ok(true)
			}
			Err(e) => {
				log::warn!("cannot compute coverage of {path:?}: {e:#}");
				Ok(false)
			}
		}
	}

	fn is_open(&self) -> bool {
		matches!(&*self.state.read(), DatabaseState::Opened(_))
	}

	fn close(&self) {
		let previous = std::mem::replace(&mut *self.state.write(), DatabaseState::Closed);
		if let DatabaseState::Opened(opened) = previous {
			log::debug!("close database over container {}", opened.container.id());
		}
	}

	fn coverage(&self) -> Option<Coverage> {
		match &*self.state.read() {
			DatabaseState::Opened(opened) => Some(opened.coverage.clone()),
			_ => None,
		}
	}

	fn coverages(&self) -> HashMap<String, Coverage> {
		match &*self.state.read() {
			DatabaseState::Opened(opened) => {
				HashMap::from([(opened.container.name().to_string(), opened.coverage.clone())])
			}
			_ => HashMap::new(),
		}
	}

	fn coverage_for(&self, dataset_type: Option<&str>) -> Option<Coverage> {
		match &*self.state.read() {
			DatabaseState::Opened(opened) if dataset_type.is_none_or(|t| t == opened.container.name()) => {
				Some(opened.coverage.clone())
			}
			_ => None,
		}
	}

	fn query(&self, params: &QueryParameters) -> Result<Box<dyn MosaicCursor>> {
		match &*self.state.read() {
			DatabaseState::Opened(opened) => opened.query(params),
			DatabaseState::Unopened => bail!(MosaicError::InvalidState("database is not open".into())),
			DatabaseState::Closed => bail!(MosaicError::InvalidState("database is closed".into())),
		}
	}
}
