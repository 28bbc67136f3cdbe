use super::schema::{TILE_TABLE, check_schema, read_info, read_zoom_range};
use crate::{ContainerOptions, TileContainer};
use anyhow::{Result, anyhow, bail};
use parking_lot::RwLock;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::{
	SqliteConnectionManager,
	rusqlite::{OpenFlags, OptionalExtension},
};
use std::{
	fmt::Debug,
	path::{Path, PathBuf},
};
use tilemosaic_core::{
	Blob, Envelope, METERS_PER_DEGREE, MosaicError, SRID_WGS84, TileMatrix, ZoomLevel, create_quadtree,
	get_projection,
};

/// Name of the format and of its mosaic database type.
pub const CUSTOMTILES: &str = "customtiles";

/// An opened `customtiles` SQLite store.
///
/// Tiles are served through a pool of read-only connections, so point reads from many
/// threads proceed in parallel.
pub struct CustomTilesContainer {
	path: PathBuf,
	name: String,
	srid: i32,
	origin_x: f64,
	origin_y: f64,
	bounds: Envelope,
	zoom_levels: Vec<ZoomLevel>,
	pool: RwLock<Option<Pool<SqliteConnectionManager>>>,
}

impl CustomTilesContainer {
	/// Opens `path` if it is a `customtiles` store.
	///
	/// Anything that is not this format, including files that cannot be opened, yields
	/// `None`. Use [`try_open`](Self::try_open) to learn why.
	pub fn open(path: &Path, options: &ContainerOptions) -> Option<CustomTilesContainer> {
		match CustomTilesContainer::try_open(path, options) {
			Ok(container) => Some(container),
			Err(e) => {
				log::debug!("{path:?} is not a {CUSTOMTILES} store: {e:#}");
				None
			}
		}
	}

	/// Opens `path` and validates its schema.
	///
	/// Fails with [`MosaicError::NotFound`] for a missing file, [`MosaicError::SchemaMismatch`]
	/// for a store in another format, [`MosaicError::UnsupportedSrid`] for an SRID that
	/// cannot be projected and [`MosaicError::Io`] when SQLite cannot be reached.
	pub fn try_open(path: &Path, options: &ContainerOptions) -> Result<CustomTilesContainer> {
		log::debug!("open {path:?}");

		if !path.is_file() {
			bail!(MosaicError::NotFound(format!("file {path:?} does not exist")));
		}

		let manager = SqliteConnectionManager::file(path)
			.with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX);
		let pool = Pool::builder()
			.max_size(options.pool_size.max(1))
			.min_idle(Some(0))
			.connection_timeout(options.connection_timeout)
			.build(manager)
			.map_err(|e| io_error(&e, format!("creating connection pool for {path:?}")))?;

		let (info, (min_zoom, max_zoom)) = {
			let conn = pool
				.get()
				.map_err(|e| io_error(&e, format!("connecting to {path:?}")))?;
			check_schema(&conn)?;
			(read_info(&conn)?, read_zoom_range(&conn)?)
		};

		get_projection(info.srid)?;

		let resolution = if info.srid == SRID_WGS84 {
			info.pixel_size_y * METERS_PER_DEGREE
		} else {
			info.pixel_size_x
		};
		let base = ZoomLevel::new(
			0,
			resolution,
			info.pixel_size_x,
			info.pixel_size_y,
			info.tile_width,
			info.tile_height,
		);
		let zoom_levels = create_quadtree(&base.finer_by(min_zoom), usize::from(max_zoom - min_zoom) + 1);

		log::debug!(
			"opened {path:?}: srid {}, zoom {min_zoom}..={max_zoom}, bounds {:?}",
			info.srid,
			info.bounds
		);

		let name = path
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_default();

		Ok(CustomTilesContainer {
			path: path.to_path_buf(),
			name,
			srid: info.srid,
			origin_x: info.origin_x,
			origin_y: info.origin_y,
			bounds: info.bounds,
			zoom_levels,
			pool: RwLock::new(Some(pool)),
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
		let guard = self.pool.read();
		let Some(pool) = guard.as_ref() else {
			panic!("container {:?} used after dispose", self.path);
		};
		pool
			.get()
			.map_err(|e| io_error(&e, format!("connecting to {:?}", self.path)))
	}
}

fn io_error(error: &dyn std::error::Error, action: String) -> anyhow::Error {
	anyhow!(MosaicError::Io(format!("{action}: {error}")))
}

impl TileMatrix for CustomTilesContainer {
	/// The file name, which doubles as the imagery type of the dataset.
	fn name(&self) -> &str {
		&self.name
	}

	fn srid(&self) -> i32 {
		self.srid
	}

	fn origin_x(&self) -> f64 {
		self.origin_x
	}

	fn origin_y(&self) -> f64 {
		self.origin_y
	}

	fn zoom_levels(&self) -> &[ZoomLevel] {
		&self.zoom_levels
	}

	fn bounds(&self) -> Envelope {
		self.bounds
	}
}

impl TileContainer for CustomTilesContainer {
	fn is_read_only(&self) -> bool {
		true
	}

	fn get_tile_data(&self, zoom: u8, column: u32, row: u32) -> Result<Option<Blob>> {
		log::trace!("read tile {zoom}/{column}/{row} from {:?}", self.path);

		let conn = self.connection()?;
		conn
			.query_row(
				&format!("SELECT tile FROM {TILE_TABLE} WHERE z = ?1 AND y = ?2 AND x = ?3"),
				[i64::from(zoom), i64::from(row), i64::from(column)],
				|r| r.get::<_, Vec<u8>>(0),
			)
			.optional()
			.map(|data| data.map(Blob::from))
			.map_err(|e| io_error(&e, format!("reading tile {zoom}/{column}/{row} from {:?}", self.path)))
	}

	fn set_tile(&self, zoom: u8, column: u32, row: u32, _data: Blob) -> Result<()> {
		bail!(MosaicError::UnsupportedOperation(format!(
			"cannot write tile {zoom}/{column}/{row}: {CUSTOMTILES} stores are read-only"
		)))
	}

	fn dispose(&self) {
		let pool = self.pool.write().take();
		assert!(pool.is_some(), "container {:?} disposed twice", self.path);
		log::debug!("dispose {:?}", self.path);
		drop(pool);
	}

	fn is_disposed(&self) -> bool {
		self.pool.read().is_none()
	}
}

impl Debug for CustomTilesContainer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CustomTilesContainer")
			.field("path", &self.path)
			.field("srid", &self.srid)
			.field("bounds", &self.bounds)
			.field("zoom_levels", &self.zoom_levels.len())
			.field("disposed", &self.is_disposed())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{CustomTilesFixture, solid_png};
	use approx::assert_relative_eq;
	use rstest::rstest;
	use std::sync::Arc;

	fn open(fixture: &CustomTilesFixture) -> (tempfile::TempDir, CustomTilesContainer) {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("store.sqlite");
		fixture.write(&path).unwrap();
		let container = CustomTilesContainer::try_open(&path, &ContainerOptions::default()).unwrap();
		(dir, container)
	}

	#[test]
	fn zoom_levels_start_at_min_zoom() {
		let fixture = CustomTilesFixture::new()
			.pixel_size(100.0, 50.0)
			.tile(2, 0, 0, b"a")
			.tile(4, 0, 0, b"b");
		let (_dir, container) = open(&fixture);

		let levels = container.zoom_levels();
		assert_eq!(levels.iter().map(|l| l.level).collect::<Vec<_>>(), vec![2, 3, 4]);
		assert_eq!(levels[0].pixel_size_x, 25.0);
		assert_eq!(levels[0].pixel_size_y, 12.5);
		assert_eq!(levels[2].resolution, 6.25);
	}

	#[test]
	fn named_after_file() {
		let (_dir, container) = open(&CustomTilesFixture::new().tile(0, 0, 0, b"a"));
		assert_eq!(container.name(), "store.sqlite");
		assert_eq!(container.path().file_name().unwrap(), "store.sqlite");
	}

	#[test]
	fn geographic_resolution_in_meters() {
		let fixture = CustomTilesFixture::new()
			.srid(4326)
			.origin(-180.0, 90.0)
			.bounds(-180.0, -90.0, 180.0, 90.0)
			.tile_size(256, 256)
			.pixel_size(0.703_125, 0.703_125)
			.tile(0, 0, 0, b"a");
		let (_dir, container) = open(&fixture);
		assert_relative_eq!(container.zoom_levels()[0].resolution, 0.703_125 * 111_111.0);
	}

	#[rstest]
	#[case(0, 0, 0, Some(&b"zero"[..]))]
	#[case(1, 1, 0, Some(&b"one"[..]))]
	#[case(1, 0, 1, None)]
	#[case(5, 0, 0, None)]
	fn tile_lookup(#[case] zoom: u8, #[case] column: u32, #[case] row: u32, #[case] expected: Option<&[u8]>) {
		let fixture = CustomTilesFixture::new().tile(0, 0, 0, b"zero").tile(1, 0, 1, b"one");
		let (_dir, container) = open(&fixture);
		assert_eq!(
			container.get_tile_data(zoom, column, row).unwrap(),
			expected.map(Blob::from)
		);
		assert_eq!(container.has_tile(zoom, column, row).unwrap(), expected.is_some());
	}

	#[test]
	fn decodes_tiles() {
		let fixture = CustomTilesFixture::new()
			.tile(0, 0, 0, solid_png(4, 2, [10, 20, 30, 255]))
			.tile(1, 0, 0, b"not an image");
		let (_dir, container) = open(&fixture);

		let image = container.get_tile(0, 0, 0).unwrap().unwrap();
		assert_eq!((image.width(), image.height()), (4, 2));
		assert!(container.get_tile(1, 1, 1).unwrap().is_none());

		let error = container.get_tile(1, 0, 0).unwrap_err();
		assert!(matches!(MosaicError::classify(&error), Some(MosaicError::Decode(_))));
	}

	#[test]
	fn is_read_only() {
		let (_dir, container) = open(&CustomTilesFixture::new().tile(0, 0, 0, b"a"));
		assert!(container.is_read_only());
		assert!(!container.has_tile_expiration_metadata());
		assert_eq!(container.tile_expiration(0, 0, 0), None);

		let error = container.set_tile(0, 0, 0, Blob::from(b"b")).unwrap_err();
		assert!(matches!(
			MosaicError::classify(&error),
			Some(MosaicError::UnsupportedOperation(_))
		));
		assert_eq!(container.get_tile_data(0, 0, 0).unwrap(), Some(Blob::from(b"a")));
	}

	#[test]
	fn open_rejects_other_files() {
		let dir = tempfile::tempdir().unwrap();
		let options = ContainerOptions::default();

		let missing = dir.path().join("missing.sqlite");
		let error = CustomTilesContainer::try_open(&missing, &options).unwrap_err();
		assert!(matches!(MosaicError::classify(&error), Some(MosaicError::NotFound(_))));
		assert!(CustomTilesContainer::open(&missing, &options).is_none());

		let text = dir.path().join("notes.txt");
		std::fs::write(&text, "these are not the tiles you are looking for, not even close").unwrap();
		let error = CustomTilesContainer::try_open(&text, &options).unwrap_err();
		assert!(matches!(
			MosaicError::classify(&error),
			Some(MosaicError::SchemaMismatch(_))
		));
		assert!(CustomTilesContainer::open(dir.path(), &options).is_none());
	}

	#[test]
	fn open_rejects_unknown_srid() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("store.sqlite");
		CustomTilesFixture::new().srid(1).tile(0, 0, 0, b"a").write(&path).unwrap();

		let error = CustomTilesContainer::try_open(&path, &ContainerOptions::default()).unwrap_err();
		assert_eq!(MosaicError::classify(&error), Some(&MosaicError::UnsupportedSrid(1)));
	}

	#[test]
	fn dispose() {
		let (_dir, container) = open(&CustomTilesFixture::new().tile(0, 0, 0, b"a"));
		assert!(!container.is_disposed());
		container.dispose();
		assert!(container.is_disposed());
	}

	#[test]
	#[should_panic(expected = "disposed twice")]
	fn double_dispose_panics() {
		let (_dir, container) = open(&CustomTilesFixture::new().tile(0, 0, 0, b"a"));
		container.dispose();
		container.dispose();
	}

	#[test]
	#[should_panic(expected = "used after dispose")]
	fn use_after_dispose_panics() {
		let (_dir, container) = open(&CustomTilesFixture::new().tile(0, 0, 0, b"a"));
		container.dispose();
		let _ = container.get_tile_data(0, 0, 0);
	}

	#[test]
	fn concurrent_reads() {
		let mut fixture = CustomTilesFixture::new();
		for row in 0..4 {
			for column in 0..4 {
				fixture = fixture.tile(2, row, column, format!("{row}/{column}").into_bytes());
			}
		}
		let (_dir, container) = open(&fixture);
		let container = Arc::new(container);

		let handles = (0..8)
			.map(|thread| {
				let container = Arc::clone(&container);
				std::thread::spawn(move || {
					for i in 0..32u32 {
						let (row, column) = ((i + thread) % 4, i % 4);
						let blob = container.get_tile_data(2, column, row).unwrap().unwrap();
						assert_eq!(blob.as_slice(), format!("{row}/{column}").as_bytes());
					}
				})
			})
			.collect::<Vec<_>>();
		for handle in handles {
			handle.join().unwrap();
		}
	}
}
