use super::{ResampleFilter, TileLocator};
use crate::{ActiveContainers, ContainerRef};
use anyhow::{Result, anyhow, ensure};
use image::{DynamicImage, RgbaImage};
use tilemosaic_core::{MosaicError, ZoomLevel};

/// Reads the pixels behind a [`TileLocator`].
///
/// The container is looked up on every call, so an adapter may outlive the container it
/// points to; reads then fail with [`MosaicError::NotFound`].
#[derive(Clone, Debug)]
pub struct TileReaderAdapter {
	locator: TileLocator,
	containers: ActiveContainers,
	filter: ResampleFilter,
}

impl TileReaderAdapter {
	pub fn is_supported(uri: &str) -> bool {
		TileLocator::is_locator(uri)
	}

	/// An adapter for `uri`, or `None` if it is not a well-formed locator.
	pub fn create(containers: &ActiveContainers, uri: &str, filter: ResampleFilter) -> Option<TileReaderAdapter> {
		match uri.parse::<TileLocator>() {
			Ok(locator) => Some(TileReaderAdapter {
				locator,
				containers: containers.clone(),
				filter,
			}),
			Err(e) => {
				log::debug!("cannot read '{uri}': {e:#}");
				None
			}
		}
	}

	pub fn locator(&self) -> &TileLocator {
		&self.locator
	}

	fn container(&self) -> Result<ContainerRef> {
		self.containers.find(&self.locator.container_id).ok_or_else(|| {
			anyhow!(MosaicError::NotFound(format!(
				"container {} is no longer open",
				self.locator.container_id
			)))
		})
	}

	fn zoom_level(&self) -> Option<ZoomLevel> {
		let container = self.containers.find(&self.locator.container_id)?;
		container
			.zoom_levels()
			.iter()
			.find(|level| level.level == self.locator.zoom)
			.copied()
	}

	/// Native tile width, or 1 if the container or level is gone.
	pub fn tile_width(&self) -> u32 {
		self.zoom_level().map_or(1, |level| level.tile_width)
	}

	/// Native tile height, or 1 if the container or level is gone.
	pub fn tile_height(&self) -> u32 {
		self.zoom_level().map_or(1, |level| level.tile_height)
	}

	/// The whole tile, decoded.
	pub fn read_tile(&self) -> Result<DynamicImage> {
		let TileLocator { zoom, row, column, .. } = self.locator;
		self.container()?.get_tile(zoom, column, row)?.ok_or_else(|| {
			anyhow!(MosaicError::NotFound(format!(
				"tile {zoom}/{row}/{column} is not stored in container {}",
				self.locator.container_id
			)))
		})
	}

	/// The source rectangle `(src_x, src_y, src_width, src_height)` of the tile, scaled to
	/// `dst_width × dst_height`.
	///
	/// The native decode is returned unchanged when the rectangle is the whole tile and the
	/// size matches.
	pub fn read(
		&self,
		src_x: u32,
		src_y: u32,
		src_width: u32,
		src_height: u32,
		dst_width: u32,
		dst_height: u32,
	) -> Result<RgbaImage> {
		ensure!(
			src_width > 0 && src_height > 0 && dst_width > 0 && dst_height > 0,
			"regions must not be empty"
		);

		let image = self.read_tile()?;
		let (width, height) = (image.width(), image.height());
		ensure!(
			src_x.checked_add(src_width).is_some_and(|x| x <= width)
				&& src_y.checked_add(src_height).is_some_and(|y| y <= height),
			"region ({src_x}, {src_y}, {src_width}, {src_height}) exceeds the {width}x{height} tile {}",
			self.locator
		);

		let region = if (src_x, src_y, src_width, src_height) == (0, 0, width, height) {
			image
		} else {
			image.crop_imm(src_x, src_y, src_width, src_height)
		};

		let region = if (dst_width, dst_height) == (src_width, src_height) {
			region
		} else {
			log::trace!(
				"scale {} from {src_width}x{src_height} to {dst_width}x{dst_height}",
				self.locator
			);
			region.resize_exact(dst_width, dst_height, self.filter.into())
		};

		Ok(region.into_rgba8())
	}
}
