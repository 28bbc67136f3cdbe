//! The plain-string address of one stored tile:
//! `tiles://<container id>/<zoom>/<row>/<column>`.
//!
//! A locator carries no reference to its container. Whoever receives one must resolve the
//! id through [`ActiveContainers::find`](crate::ActiveContainers::find) and be prepared
//! for the container to be gone.

use anyhow::{Context, Result, ensure};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

pub const LOCATOR_SCHEME: &str = "tiles://";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileLocator {
	pub container_id: Uuid,
	pub zoom: u8,
	pub row: u32,
	pub column: u32,
}

impl TileLocator {
	#[must_use]
	pub fn new(container_id: Uuid, zoom: u8, row: u32, column: u32) -> TileLocator {
		TileLocator {
			container_id,
			zoom,
			row,
			column,
		}
	}

	/// Whether `uri` uses the locator scheme. Says nothing about the rest of the string.
	#[must_use]
	pub fn is_locator(uri: &str) -> bool {
		uri.starts_with(LOCATOR_SCHEME)
	}
}

impl Display for TileLocator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{LOCATOR_SCHEME}{}/{}/{}/{}",
			self.container_id, self.zoom, self.row, self.column
		)
	}
}

impl FromStr for TileLocator {
	type Err = anyhow::Error;

	fn from_str(uri: &str) -> Result<Self> {
		let path = uri
			.strip_prefix(LOCATOR_SCHEME)
			.with_context(|| format!("'{uri}' does not start with {LOCATOR_SCHEME}"))?;
		let parts = path.split('/').collect::<Vec<_>>();
		ensure!(
			parts.len() == 4,
			"'{uri}' must have the form {LOCATOR_SCHEME}<id>/<zoom>/<row>/<column>"
		);

		Ok(TileLocator {
			container_id: Uuid::parse_str(parts[0]).with_context(|| format!("invalid container id in '{uri}'"))?,
			zoom: parts[1].parse().with_context(|| format!("invalid zoom in '{uri}'"))?,
			row: parts[2].parse().with_context(|| format!("invalid row in '{uri}'"))?,
			column: parts[3].parse().with_context(|| format!("invalid column in '{uri}'"))?,
		})
	}
}
