//! Dataset probing for import pipelines.
//!
//! [`probe`] answers cheaply whether a file is a `customtiles` store, and [`describe`]
//! summarises one for a catalogue. Both open the container outside any registry and
//! dispose it before returning.

use anyhow::{Context, Result};
use std::path::Path;
use tilemosaic_container::{CUSTOMTILES, ContainerOptions, CustomTilesContainer, TileContainer};
use tilemosaic_core::{GeoPoint, TileMatrix, get_projection};

/// Catalogue entry for one imagery file.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetDescriptor {
	/// File name.
	pub name: String,
	/// Absolute path of the file.
	pub uri: String,
	pub provider: String,
	pub dataset_type: String,
	/// Imagery types the dataset serves. Queries filter on these names.
	pub imagery_types: Vec<String>,
	/// Full-resolution size of the data region in pixels.
	pub width: u32,
	pub height: u32,
	/// Number of zoom levels.
	pub levels: usize,
	/// Upper left, upper right, lower right and lower left corner in WGS 84.
	pub corners: [GeoPoint; 4],
	pub srid: i32,
}

/// Disposes the wrapped container when dropped.
struct Disposing(CustomTilesContainer);

impl Drop for Disposing {
	fn drop(&mut self) {
		self.0.dispose();
	}
}

/// Whether `path` is a readable `customtiles` store.
pub fn probe(path: &Path, options: &ContainerOptions) -> bool {
	let matches = CustomTilesContainer::open(path, options).map(Disposing).is_some();
	log::debug!("probe {path:?}: {matches}");
	matches
}

/// Describes `path`. `None` if it is not a `customtiles` store.
pub fn describe(path: &Path, options: &ContainerOptions) -> Result<Option<DatasetDescriptor>> {
	let Some(container) = CustomTilesContainer::open(path, options).map(Disposing) else {
		return Ok(None);
	};
	let container = &container.0;

	let projection = get_projection(container.srid())?;
	let bounds = container.bounds();
	let mut corners = [GeoPoint::default(); 4];
	for (corner, (x, y)) in corners.iter_mut().zip(bounds.corners()) {
		*corner = projection
			.inverse(x, y)
			.with_context(|| format!("projecting corner ({x}, {y}) of {path:?}"))?;
	}

	let levels = container.zoom_levels();
	let Some(finest) = levels.last() else {
		return Ok(None);
	};
	let width = (bounds.width() / finest.pixel_size_x).ceil() as u32;
	let height = (bounds.height() / finest.pixel_size_y).ceil() as u32;

	let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

	Ok(Some(DatasetDescriptor {
		name: container.name().to_string(),
		uri: absolute.to_string_lossy().into_owned(),
		provider: CUSTOMTILES.to_string(),
		dataset_type: CUSTOMTILES.to_string(),
		imagery_types: vec![container.name().to_string()],
		width,
		height,
		levels: levels.len(),
		corners,
		srid: container.srid(),
	}))
}
