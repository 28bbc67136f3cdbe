//! Builder pattern for constructing `MosaicRuntime` instances

use super::{MosaicRuntime, RuntimeInner};
use crate::{MosaicConfig, MosaicDatabaseFactory, MosaicDatabaseType};
use anyhow::{Result, bail};
use std::{sync::Arc, time::Duration};
use tilemosaic_container::{ActiveContainers, ContainerOptions, ResampleFilter};
use tilemosaic_core::MosaicError;

/// Builder for customized [`MosaicRuntime`]s.
///
/// Starts from [`MosaicConfig::default`]. Setters override single fields, [`config`](Self::config)
/// replaces all of them.
pub struct RuntimeBuilder {
	config: MosaicConfig,
	#[allow(clippy::type_complexity)]
	factory_customizer: Option<Box<dyn FnOnce(&MosaicDatabaseFactory)>>,
}

impl RuntimeBuilder {
	pub fn new() -> Self {
		Self {
			config: MosaicConfig::default(),
			factory_customizer: None,
		}
	}

	pub fn config(mut self, config: MosaicConfig) -> Self {
		self.config = config;
		self
	}

	pub fn pool_size(mut self, pool_size: u32) -> Self {
		self.config.pool_size = pool_size;
		self
	}

	pub fn connection_timeout(mut self, timeout: Duration) -> Self {
		self.config.connection_timeout_ms = timeout.as_millis() as u64;
		self
	}

	pub fn resample_filter(mut self, filter: ResampleFilter) -> Self {
		self.config.resample_filter = filter;
		self
	}

	/// Built-in dataset types to register, highest priority first.
	pub fn dataset_types<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.config.dataset_types = names.into_iter().map(Into::into).collect();
		self
	}

	/// Customize the database factory
	///
	/// Called once the built-in types are registered, e.g. to register custom types.
	pub fn customize_factory<F>(mut self, customizer: F) -> Self
	where
		F: FnOnce(&MosaicDatabaseFactory) + 'static,
	{
		self.factory_customizer = Some(Box::new(customizer));
		self
	}

	/// Builds the runtime. Fails on an unknown dataset type name.
	pub fn build(self) -> Result<MosaicRuntime> {
		let count = self.config.dataset_types.len();
		let mut types = Vec::with_capacity(count);
		for (index, name) in self.config.dataset_types.iter().enumerate() {
			let Some(database_type) = MosaicDatabaseType::builtin(name) else {
				bail!(MosaicError::UnsupportedOperation(format!("unknown dataset type '{name}'")));
			};
			types.push(database_type.with_priority((count - index) as i32));
		}

		Ok(assemble(
			self.config.container_options(),
			self.config.resample_filter,
			types,
			self.factory_customizer,
		))
	}
}

impl Default for RuntimeBuilder {
	fn default() -> Self {
		Self::new()
	}
}

pub(super) fn assemble(
	options: ContainerOptions,
	resample_filter: ResampleFilter,
	types: Vec<MosaicDatabaseType>,
	customizer: Option<Box<dyn FnOnce(&MosaicDatabaseFactory)>>,
) -> MosaicRuntime {
	let containers = ActiveContainers::new();
	let factory = MosaicDatabaseFactory::new(containers.clone(), options);
	for database_type in types {
		factory.register_type(database_type);
	}

	if let Some(customizer) = customizer {
		customizer(&factory);
	}

	log::debug!("runtime with dataset types {:?}", factory.type_names());

	MosaicRuntime {
		inner: Arc::new(RuntimeInner {
			containers,
			factory,
			resample_filter,
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn defaults() {
		let runtime = RuntimeBuilder::new().build().unwrap();
		assert_eq!(runtime.factory().type_names(), vec!["customtiles"]);
		assert_eq!(runtime.factory().options(), &ContainerOptions::default());
		assert_eq!(runtime.resample_filter(), ResampleFilter::Triangle);
		assert!(runtime.containers().is_empty());
	}

	#[test]
	fn overrides() {
		let runtime = RuntimeBuilder::new()
			.config(MosaicConfig {
				pool_size: 9,
				..MosaicConfig::default()
			})
			.connection_timeout(Duration::from_millis(300))
			.resample_filter(ResampleFilter::Nearest)
			.build()
			.unwrap();
		assert_eq!(
			runtime.factory().options(),
			&ContainerOptions {
				pool_size: 9,
				connection_timeout: Duration::from_millis(300),
			}
		);
		assert_eq!(runtime.resample_filter(), ResampleFilter::Nearest);
	}

	#[test]
	fn customized_factory_and_priorities() {
		let runtime = RuntimeBuilder::new()
			.customize_factory(|factory| {
				factory.register_type(MosaicDatabaseType::new("preferred", 5, |_, _| None));
				factory.register_type(MosaicDatabaseType::new("fallback", 0, |_, _| None));
			})
			.build()
			.unwrap();
		assert_eq!(runtime.factory().type_names(), vec!["preferred", "customtiles", "fallback"]);
	}

	#[test]
	fn unknown_dataset_type() {
		let error = RuntimeBuilder::new().dataset_types(["geopackage"]).build().err().unwrap();
		assert!(error.to_string().contains("geopackage"));

		let runtime = RuntimeBuilder::new().dataset_types(Vec::<String>::new()).build().unwrap();
		assert!(runtime.factory().type_names().is_empty());
	}
}
