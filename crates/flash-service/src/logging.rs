//! Tracing subscriber setup.

use anyhow::{anyhow, Result};
use flash_config::{LogFormat, LoggingConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
	/// Filter directive used when `RUST_LOG` is not set
	pub filter: String,
	pub json_format: bool,
	pub with_target: bool,
	pub with_file_and_line: bool,
}

impl Default for TracingConfig {
	fn default() -> Self {
		Self {
			filter: "info".to_string(),
			json_format: false,
			with_target: true,
			with_file_and_line: false,
		}
	}
}

impl TracingConfig {
	pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
		self.filter = filter.into();
		self
	}

	pub fn with_json_format(mut self, json: bool) -> Self {
		self.json_format = json;
		self
	}

	/// `RUST_LOG` wins over the configured directive.
	fn env_filter(&self) -> Result<EnvFilter> {
		match EnvFilter::try_from_default_env() {
			Ok(filter) => Ok(filter),
			Err(_) => EnvFilter::try_new(&self.filter)
				.map_err(|e| anyhow!("Invalid log filter '{}': {}", self.filter, e)),
		}
	}
}

impl From<&LoggingConfig> for TracingConfig {
	fn from(config: &LoggingConfig) -> Self {
		Self::default()
			.with_filter(config.level.clone())
			.with_json_format(config.format == LogFormat::Json)
	}
}

/// Initialize tracing with the given configuration
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
	let subscriber = tracing_subscriber::registry().with(config.env_filter()?);

	if config.json_format {
		let json_layer = tracing_subscriber::fmt::layer()
			.json()
			.with_file(config.with_file_and_line)
			.with_line_number(config.with_file_and_line)
			.with_target(config.with_target);

		subscriber
			.with(json_layer)
			.try_init()
			.map_err(|e| anyhow!("Failed to initialize tracing: {}", e))?;
	} else {
		let fmt_layer = tracing_subscriber::fmt::layer()
			.with_file(config.with_file_and_line)
			.with_line_number(config.with_file_and_line)
			.with_target(config.with_target);

		subscriber
			.with(fmt_layer)
			.try_init()
			.map_err(|e| anyhow!("Failed to initialize tracing: {}", e))?;
	}

	info!("Tracing initialized with filter: {}", config.filter);
	Ok(())
}
