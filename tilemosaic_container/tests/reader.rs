use pretty_assertions::assert_eq;
use std::{path::Path, sync::Arc};
use tilemosaic_container::{
	ActiveContainers, ContainerOptions, ContainerRef, CustomTilesContainer, ResampleFilter, TileLocator,
	TileReaderAdapter,
	testing::{CustomTilesFixture, coordinate_png},
};
use tilemosaic_core::MosaicError;

fn register(registry: &ActiveContainers, path: &Path) -> ContainerRef {
	let fixture = CustomTilesFixture::new()
		.tile_size(4, 4)
		.tile(0, 0, 0, coordinate_png(4, 4))
		.tile(1, 0, 1, b"garbage".to_vec());
	fixture.write(path).unwrap();
	let container = CustomTilesContainer::try_open(path, &ContainerOptions::default()).unwrap();
	registry.register(Arc::new(container))
}

fn adapter(registry: &ActiveContainers, reference: &ContainerRef, zoom: u8, row: u32, column: u32) -> TileReaderAdapter {
	let uri = TileLocator::new(reference.id(), zoom, row, column).to_string();
	assert!(TileReaderAdapter::is_supported(&uri));
	TileReaderAdapter::create(registry, &uri, ResampleFilter::Nearest).unwrap()
}

#[test]
fn native_read() {
	let dir = tempfile::tempdir().unwrap();
	let registry = ActiveContainers::new();
	let reference = register(&registry, &dir.path().join("store.sqlite"));

	let reader = adapter(&registry, &reference, 0, 0, 0);
	assert_eq!((reader.tile_width(), reader.tile_height()), (4, 4));

	let image = reader.read(0, 0, 4, 4, 4, 4).unwrap();
	assert_eq!(image.dimensions(), (4, 4));
	assert_eq!(image.get_pixel(3, 2).0, [3, 2, 0, 255]);
}

#[test]
fn clipped_and_scaled_read() {
	let dir = tempfile::tempdir().unwrap();
	let registry = ActiveContainers::new();
	let reference = register(&registry, &dir.path().join("store.sqlite"));
	let reader = adapter(&registry, &reference, 0, 0, 0);

	let clipped = reader.read(2, 1, 2, 2, 2, 2).unwrap();
	assert_eq!(clipped.dimensions(), (2, 2));
	assert_eq!(clipped.get_pixel(0, 0).0, [2, 1, 0, 255]);
	assert_eq!(clipped.get_pixel(1, 1).0, [3, 2, 0, 255]);

	let scaled = reader.read(2, 2, 2, 2, 4, 4).unwrap();
	assert_eq!(scaled.dimensions(), (4, 4));
	assert_eq!(scaled.get_pixel(0, 0).0, [2, 2, 0, 255]);
	assert_eq!(scaled.get_pixel(3, 3).0, [3, 3, 0, 255]);

	assert!(reader.read(3, 3, 2, 2, 2, 2).is_err());
	assert!(reader.read(0, 0, 0, 4, 4, 4).is_err());
}

#[test]
fn corrupt_and_missing_tiles() {
	let dir = tempfile::tempdir().unwrap();
	let registry = ActiveContainers::new();
	let reference = register(&registry, &dir.path().join("store.sqlite"));

	let corrupt = adapter(&registry, &reference, 1, 0, 1);
	let error = corrupt.read(0, 0, 4, 4, 4, 4).unwrap_err();
	assert!(matches!(MosaicError::classify(&error), Some(MosaicError::Decode(_))));

	let missing = adapter(&registry, &reference, 1, 1, 1);
	let error = missing.read_tile().unwrap_err();
	assert!(matches!(MosaicError::classify(&error), Some(MosaicError::NotFound(_))));
}

#[test]
fn released_container() {
	let dir = tempfile::tempdir().unwrap();
	let registry = ActiveContainers::new();
	let reference = register(&registry, &dir.path().join("store.sqlite"));
	let reader = adapter(&registry, &reference, 0, 0, 0);

	drop(reference);
	assert!(registry.is_empty());
	assert_eq!((reader.tile_width(), reader.tile_height()), (1, 1));

	let error = reader.read(0, 0, 4, 4, 4, 4).unwrap_err();
	assert!(matches!(MosaicError::classify(&error), Some(MosaicError::NotFound(_))));
}

#[test]
fn reader_does_not_keep_container_alive() {
	let dir = tempfile::tempdir().unwrap();
	let registry = ActiveContainers::new();
	let reference = register(&registry, &dir.path().join("store.sqlite"));
	let reader = adapter(&registry, &reference, 0, 0, 0);

	reader.read_tile().unwrap();
	assert_eq!(reference.ref_count(), 1);
}

#[test]
fn malformed_locators() {
	let registry = ActiveContainers::new();
	assert!(!TileReaderAdapter::is_supported("file:///tile.png"));
	assert!(TileReaderAdapter::create(&registry, "file:///tile.png", ResampleFilter::default()).is_none());
	assert!(TileReaderAdapter::create(&registry, "tiles://nope/1/2/3", ResampleFilter::default()).is_none());
}
