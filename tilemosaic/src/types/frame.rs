use tilemosaic_container::TileLocator;
use tilemosaic_core::GeoPoint;

/// One tile returned by a mosaic query.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
	pub(crate) corners: [GeoPoint; 4],
	pub(crate) locator: TileLocator,
	pub(crate) dataset_type: String,
	pub(crate) resolution: f64,
	pub(crate) width: u32,
	pub(crate) height: u32,
	pub(crate) srid: i32,
}

impl Frame {
	/// Corners in WGS 84, ordered upper-left, upper-right, lower-right, lower-left.
	pub fn corners(&self) -> &[GeoPoint; 4] {
		&self.corners
	}

	pub fn upper_left(&self) -> GeoPoint {
		self.corners[0]
	}

	pub fn upper_right(&self) -> GeoPoint {
		self.corners[1]
	}

	pub fn lower_right(&self) -> GeoPoint {
		self.corners[2]
	}

	pub fn lower_left(&self) -> GeoPoint {
		self.corners[3]
	}

	pub fn min_latitude(&self) -> f64 {
		self.corners.iter().map(|p| p.latitude).fold(f64::INFINITY, f64::min)
	}

	pub fn max_latitude(&self) -> f64 {
		self.corners.iter().map(|p| p.latitude).fold(f64::NEG_INFINITY, f64::max)
	}

	pub fn min_longitude(&self) -> f64 {
		self.corners.iter().map(|p| p.longitude).fold(f64::INFINITY, f64::min)
	}

	pub fn max_longitude(&self) -> f64 {
		self.corners.iter().map(|p| p.longitude).fold(f64::NEG_INFINITY, f64::max)
	}

	/// Where to fetch the pixels of this frame.
	pub fn locator(&self) -> &TileLocator {
		&self.locator
	}

	pub fn path(&self) -> String {
		self.locator.to_string()
	}

	/// The dataset type, i.e. the name of the container the frame came from.
	pub fn dataset_type(&self) -> &str {
		&self.dataset_type
	}

	/// Ground resolution in metres per pixel; a tile has a single resolution, so the
	/// minimum and maximum GSD coincide.
	pub fn min_gsd(&self) -> f64 {
		self.resolution
	}

	pub fn max_gsd(&self) -> f64 {
		self.resolution
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	pub fn srid(&self) -> i32 {
		self.srid
	}

	pub fn zoom(&self) -> u8 {
		self.locator.zoom
	}

	pub fn row(&self) -> u32 {
		self.locator.row
	}

	pub fn column(&self) -> u32 {
		self.locator.column
	}

	/// Tiles are not mensurated imagery.
	pub fn is_precision(&self) -> bool {
		false
	}

	/// Frames have no catalogue id of their own.
	pub fn id(&self) -> i64 {
		0
	}
}
