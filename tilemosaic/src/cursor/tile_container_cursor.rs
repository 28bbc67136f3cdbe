//! Walks the stored tiles of one container that intersect a native-SRID envelope.
//!
//! Zoom levels are visited from the finest admissible index down to the coarsest, and
//! tiles row by row within a level with the column changing fastest. Consumers that
//! paint frames in this order can mask out coarse tiles wherever a finer one has
//! already covered the ground. Tiles missing from storage are skipped silently.

use super::MosaicCursor;
use crate::Frame;
use anyhow::Result;
use std::sync::Arc;
use tilemosaic_container::{ContainerRef, TileLocator};
use tilemosaic_core::{Envelope, GeoPoint, Projection, TileRange};

#[derive(Clone, Copy, Debug, PartialEq)]
enum CursorState {
	NotStarted,
	Positioned {
		zoom_index: usize,
		row: u32,
		column: u32,
		range: TileRange,
	},
	Exhausted,
}

pub struct TileContainerCursor {
	container: Option<ContainerRef>,
	projection: Arc<dyn Projection>,
	bounds: Envelope,
	low_index: usize,
	high_index: usize,
	state: CursorState,
	frame: Option<Frame>,
}

impl TileContainerCursor {
	/// A cursor over zoom indices `low_index..=high_index` of `container`, restricted to
	/// `bounds` in the container's SRID. `projection` maps that SRID to WGS 84.
	///
	/// The cursor keeps `container` referenced until it is closed or dropped.
	pub fn new(
		container: ContainerRef,
		projection: Arc<dyn Projection>,
		bounds: Envelope,
		low_index: usize,
		high_index: usize,
	) -> TileContainerCursor {
		log::debug!(
			"cursor over container {} zoom indices {low_index}..={high_index} within {bounds:?}",
			container.id()
		);
		TileContainerCursor {
			container: Some(container),
			projection,
			bounds,
			low_index,
			high_index,
			state: CursorState::NotStarted,
			frame: None,
		}
	}

	/// The first position at `zoom_index`.
	fn enter_level(container: &ContainerRef, bounds: &Envelope, zoom_index: usize) -> CursorState {
		let level = &container.zoom_levels()[zoom_index];
		let range = container.tile_range(level, bounds);
		log::trace!("enter zoom level {} with {range:?}, {} tiles", level.level, range.count());
		CursorState::Positioned {
			zoom_index,
			row: range.min_row,
			column: range.min_column,
			range,
		}
	}

	fn step(&self, container: &ContainerRef) -> CursorState {
		match self.state {
			CursorState::NotStarted => {
				if self.high_index < self.low_index || self.high_index >= container.zoom_levels().len() {
					CursorState::Exhausted
				} else {
					Self::enter_level(container, &self.bounds, self.high_index)
				}
			}
			CursorState::Positioned {
				zoom_index,
				row,
				column,
				range,
			} => match range.next_after(row, column) {
				Some((row, column)) => CursorState::Positioned {
					zoom_index,
					row,
					column,
					range,
				},
				None if zoom_index > self.low_index => Self::enter_level(container, &self.bounds, zoom_index - 1),
				None => CursorState::Exhausted,
			},
			CursorState::Exhausted => CursorState::Exhausted,
		}
	}

	fn build_frame(&self, container: &ContainerRef, zoom_index: usize, row: u32, column: u32) -> Result<Frame> {
		let level = &container.zoom_levels()[zoom_index];
		let envelope = container.tile_envelope(level, row, column);

		let mut corners = [GeoPoint::default(); 4];
		for (corner, (x, y)) in corners.iter_mut().zip(envelope.corners()) {
			*corner = self.projection.inverse(x, y)?;
		}

		Ok(Frame {
			corners,
			locator: TileLocator::new(container.id(), level.level, row, column),
			dataset_type: container.name().to_string(),
			resolution: level.resolution,
			width: level.tile_width,
			height: level.tile_height,
			srid: container.srid(),
		})
	}
}

impl MosaicCursor for TileContainerCursor {
	fn move_to_next(&mut self) -> Result<bool> {
		let Some(container) = self.container.as_ref() else {
			return Ok(false);
		};

		loop {
			self.frame = None;
			self.state = self.step(container);

			let CursorState::Positioned {
				zoom_index, row, column, ..
			} = self.state
			else {
				return Ok(false);
			};

			let zoom = container.zoom_levels()[zoom_index].level;
			if container.has_tile(zoom, column, row)? {
				self.frame = Some(self.build_frame(container, zoom_index, row, column)?);
				return Ok(true);
			}
			log::trace!("skip missing tile {zoom}/{row}/{column}");
		}
	}

	fn current(&self) -> Option<&Frame> {
		self.frame.as_ref()
	}

	fn close(&mut self) {
		if let Some(container) = self.container.take() {
			log::debug!("close cursor over container {}", container.id());
		}
		self.state = CursorState::Exhausted;
		self.frame = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use tilemosaic_container::{
		ActiveContainers, ContainerOptions, CustomTilesContainer, testing::CustomTilesFixture,
	};
	use tilemosaic_core::get_projection;

	fn cursor(
		fixture: &CustomTilesFixture,
		bounds: (f64, f64, f64, f64),
		low_index: usize,
		high_index: usize,
	) -> (tempfile::TempDir, ContainerRef, TileContainerCursor) {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("store.sqlite");
		fixture.write(&path).unwrap();
		let container = CustomTilesContainer::try_open(&path, &ContainerOptions::default()).unwrap();
		let reference = ActiveContainers::new().register(Arc::new(container));
		let cursor = TileContainerCursor::new(
			reference.reference(),
			get_projection(3857).unwrap(),
			Envelope::new(bounds.0, bounds.1, bounds.2, bounds.3).unwrap(),
			low_index,
			high_index,
		);
		(dir, reference, cursor)
	}

	fn keys(cursor: &mut TileContainerCursor) -> Vec<(u8, u32, u32)> {
		let mut keys = Vec::new();
		while cursor.move_to_next().unwrap() {
			let frame = cursor.current().unwrap();
			keys.push((frame.zoom(), frame.row(), frame.column()));
		}
		keys
	}

	#[test]
	fn state_machine() {
		let fixture = CustomTilesFixture::new().tile(0, 0, 0, b"a");
		let (_dir, _reference, mut cursor) = cursor(&fixture, (0.0, 0.0, 100.0, 100.0), 0, 0);

		assert_eq!(cursor.state, CursorState::NotStarted);
		assert!(cursor.current().is_none());

		assert!(cursor.move_to_next().unwrap());
		assert!(matches!(cursor.state, CursorState::Positioned { zoom_index: 0, row: 0, column: 0, .. }));

		assert!(!cursor.move_to_next().unwrap());
		assert_eq!(cursor.state, CursorState::Exhausted);
		assert!(cursor.current().is_none());
		assert!(!cursor.move_to_next().unwrap());
	}

	#[test]
	fn finest_first_row_major() {
		let fixture = CustomTilesFixture::new()
			.fill_level(0, 1, 1)
			.fill_level(1, 2, 2)
			.fill_level(2, 4, 4);
		let (_dir, _reference, mut cursor) = cursor(&fixture, (0.0, 50.0, 50.0, 100.0), 0, 2);

		assert_eq!(
			keys(&mut cursor),
			vec![
				(2, 0, 0),
				(2, 0, 1),
				(2, 1, 0),
				(2, 1, 1),
				(1, 0, 0),
				(0, 0, 0)
			]
		);
	}

	#[test]
	fn skips_missing_tiles() {
		let fixture = CustomTilesFixture::new().tile(1, 0, 0, b"a").tile(1, 1, 1, b"b");
		let (_dir, _reference, mut cursor) = cursor(&fixture, (0.0, 0.0, 100.0, 100.0), 0, 0);
		assert_eq!(keys(&mut cursor), vec![(1, 0, 0), (1, 1, 1)]);
	}

	#[test]
	fn frame_geometry() {
		let fixture = CustomTilesFixture::new()
			.origin(-20_037_508.342_789_244, 20_037_508.342_789_244)
			.bounds(
				-20_037_508.342_789_244,
				-20_037_508.342_789_244,
				20_037_508.342_789_244,
				20_037_508.342_789_244,
			)
			.tile_size(256, 256)
			.pixel_size(156_543.033_928_041, 156_543.033_928_041)
			.tile(1, 0, 1, b"ne");
		let (_dir, reference, mut cursor) = cursor(&fixture, (0.0, 0.0, 20_037_508.342_789_244, 20_037_508.342_789_244), 0, 0);

		assert!(cursor.move_to_next().unwrap());
		let frame = cursor.current().unwrap();
		approx::assert_abs_diff_eq!(frame.min_longitude(), 0.0, epsilon = 1e-9);
		approx::assert_abs_diff_eq!(frame.max_longitude(), 180.0, epsilon = 1e-9);
		approx::assert_abs_diff_eq!(frame.min_latitude(), 0.0, epsilon = 1e-9);
		approx::assert_abs_diff_eq!(frame.max_latitude(), 85.051_128_779_806_59, epsilon = 1e-9);
		approx::assert_abs_diff_eq!(frame.upper_left().longitude, 0.0, epsilon = 1e-9);
		approx::assert_abs_diff_eq!(frame.lower_right().latitude, 0.0, epsilon = 1e-9);
		assert_eq!((frame.width(), frame.height()), (256, 256));
		assert_eq!(frame.srid(), 3857);
		assert_eq!(frame.dataset_type(), "store.sqlite");
		assert_eq!(frame.path(), format!("tiles://{}/1/0/1", reference.id()));
		assert_eq!((frame.id(), frame.is_precision()), (0, false));
		approx::assert_relative_eq!(frame.min_gsd(), 78_271.516_964_020_5);
	}

	#[test]
	fn close_releases_reference() {
		let fixture = CustomTilesFixture::new().tile(0, 0, 0, b"a");
		let (_dir, reference, mut cursor) = cursor(&fixture, (0.0, 0.0, 100.0, 100.0), 0, 0);

		assert_eq!(reference.ref_count(), 2);
		cursor.close();
		assert_eq!(reference.ref_count(), 1);
		cursor.close();
		assert_eq!(reference.ref_count(), 1);
		assert!(!cursor.move_to_next().unwrap());
	}
}
