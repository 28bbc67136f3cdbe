use anyhow::{Result, anyhow};
use image::DynamicImage;
use std::time::SystemTime;
use tilemosaic_core::{Blob, MosaicError, TileMatrix};

/// A handle to one persisted tile pyramid.
///
/// Lookups take `(zoom, column, row)` with rows counted downward from the matrix origin.
/// All methods are safe for concurrent callers. Calling anything except
/// [`is_disposed`](TileContainer::is_disposed) after [`dispose`](TileContainer::dispose)
/// panics, as does disposing twice.
pub trait TileContainer: TileMatrix {
	fn is_read_only(&self) -> bool;

	/// Raw stored bytes of one tile, `None` if the tile is absent.
	///
	/// Storage faults are reported as an error carrying [`MosaicError::Io`].
	fn get_tile_data(&self, zoom: u8, column: u32, row: u32) -> Result<Option<Blob>>;

	/// Stores one tile. Read-only formats fail with [`MosaicError::UnsupportedOperation`].
	fn set_tile(&self, zoom: u8, column: u32, row: u32, data: Blob) -> Result<()>;

	fn has_tile(&self, zoom: u8, column: u32, row: u32) -> Result<bool> {
		Ok(self.get_tile_data(zoom, column, row)?.is_some())
	}

	/// Decoded image of one tile, `None` if the tile is absent.
	///
	/// A blob that is not a decodable image fails with [`MosaicError::Decode`].
	fn get_tile(&self, zoom: u8, column: u32, row: u32) -> Result<Option<DynamicImage>> {
		let Some(blob) = self.get_tile_data(zoom, column, row)? else {
			return Ok(None);
		};
		image::load_from_memory(blob.as_slice())
			.map(Some)
			.map_err(|e| anyhow!(MosaicError::Decode(format!("tile {zoom}/{column}/{row}: {e}"))))
	}

	fn has_tile_expiration_metadata(&self) -> bool {
		false
	}

	fn tile_expiration(&self, _zoom: u8, _column: u32, _row: u32) -> Option<SystemTime> {
		None
	}

	/// Releases the storage handle.
	fn dispose(&self);

	fn is_disposed(&self) -> bool;
}
