use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
	time::Duration,
};
use tilemosaic_container::{CUSTOMTILES, ContainerOptions, ResampleFilter};

/// Runtime settings, usually read from YAML.
///
/// ```yaml
/// pool_size: 8
/// connection_timeout_ms: 2000
/// dataset_types: [customtiles]
/// resample_filter: lanczos3
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MosaicConfig {
	/// SQLite connections per opened container
	pub pool_size: u32,

	/// How long a tile read waits for a free connection, in milliseconds
	pub connection_timeout_ms: u64,

	/// Dataset types registered at start, highest priority first
	pub dataset_types: Vec<String>,

	/// Interpolation used when the tile reader scales a tile
	pub resample_filter: ResampleFilter,
}

impl Default for MosaicConfig {
	fn default() -> Self {
		let options = ContainerOptions::default();
		MosaicConfig {
			pool_size: options.pool_size,
			connection_timeout_ms: options.connection_timeout.as_millis() as u64,
			dataset_types: vec![CUSTOMTILES.to_string()],
			resample_filter: ResampleFilter::default(),
		}
	}
}

impl MosaicConfig {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening config {path:?}"))?;
		MosaicConfig::from_reader(BufReader::new(file)).with_context(|| format!("parsing config {path:?}"))
	}

	pub fn container_options(&self) -> ContainerOptions {
		ContainerOptions {
			pool_size: self.pool_size,
			connection_timeout: Duration::from_millis(self.connection_timeout_ms),
		}
	}
}
