use image::imageops::FilterType;
use serde::Deserialize;

/// Interpolation used when a tile is scaled on read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
	Nearest,
	#[default]
	Triangle,
	CatmullRom,
	Lanczos3,
}

impl From<ResampleFilter> for FilterType {
	fn from(filter: ResampleFilter) -> Self {
		match filter {
			ResampleFilter::Nearest => FilterType::Nearest,
			ResampleFilter::Triangle => FilterType::Triangle,
			ResampleFilter::CatmullRom => FilterType::CatmullRom,
			ResampleFilter::Lanczos3 => FilterType::Lanczos3,
		}
	}
}
