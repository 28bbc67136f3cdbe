use std::time::Duration;

/// Storage settings applied when a container is opened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerOptions {
	/// Maximum number of pooled SQLite connections per container.
	pub pool_size: u32,
	/// How long a reader waits for a free connection before failing.
	pub connection_timeout: Duration,
}

impl Default for ContainerOptions {
	fn default() -> Self {
		ContainerOptions {
			pool_size: 4,
			connection_timeout: Duration::from_millis(5000),
		}
	}
}
