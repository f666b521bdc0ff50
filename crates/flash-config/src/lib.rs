//! Configuration loading for the flash settlement simulator.

use std::env;
use std::path::Path;

use alloy_primitives::U256;
use flash_types::ConfigSchema;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

pub mod schema;
pub mod serde_helpers;
pub mod types;

pub use schema::FlashConfigSchema;
pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

impl From<flash_types::ValidationError> for ConfigError {
	fn from(err: flash_types::ValidationError) -> Self {
		ConfigError::ValidationError(err.to_string())
	}
}

/// Configuration loader with environment variable substitution
#[derive(Default)]
pub struct ConfigLoader {
	file_path: Option<String>,
	env_prefix: String,
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "FLASH_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_string_lossy().to_string());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	pub async fn load(&self) -> Result<FlashConfig, ConfigError> {
		let Some(file_path) = &self.file_path else {
			return Err(ConfigError::FileNotFound(
				"No configuration file specified".to_string(),
			));
		};

		let content = match tokio::fs::read_to_string(file_path).await {
			Ok(content) => content,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				return Err(ConfigError::FileNotFound(file_path.clone()));
			}
			Err(e) => return Err(e.into()),
		};
		debug!("Loaded configuration from {}", file_path);

		self.load_from_str(&content)
	}

	/// Parses, validates and overrides a configuration held in memory.
	pub fn load_from_str(&self, content: &str) -> Result<FlashConfig, ConfigError> {
		let substituted = self.substitute_env_vars(content)?;

		let value: toml::Value =
			toml::from_str(&substituted).map_err(|e| ConfigError::ParseError(e.to_string()))?;
		FlashConfigSchema.validate(&value)?;

		let mut config: FlashConfig = value
			.try_into()
			.map_err(|e| ConfigError::ParseError(e.to_string()))?;

		self.apply_env_overrides(&mut config)?;
		self.validate_config(&config)?;

		Ok(config)
	}

	fn substitute_env_vars(&self, content: &str) -> Result<String, ConfigError> {
		let mut result = content.to_string();

		// Find and replace ${VAR_NAME} patterns
		let re = Regex::new(r"\$\{([^}]+)\}")
			.map_err(|e| ConfigError::ParseError(e.to_string()))?;

		for cap in re.captures_iter(content) {
			let full_match = &cap[0];
			let var_name = &cap[1];

			let env_value = env::var(var_name)
				.map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

			result = result.replace(full_match, &env_value);
		}

		Ok(result)
	}

	fn apply_env_overrides(&self, config: &mut FlashConfig) -> Result<(), ConfigError> {
		if let Ok(log_level) = env::var(format!("{}LOG_LEVEL", self.env_prefix)) {
			config.logging.level = log_level;
		}

		if let Ok(log_format) = env::var(format!("{}LOG_FORMAT", self.env_prefix)) {
			config.logging.format = log_format
				.parse()
				.map_err(ConfigError::ValidationError)?;
		}

		if let Ok(balance) = env::var(format!("{}EXECUTOR_BALANCE", self.env_prefix)) {
			config.scenario.executor_balance = balance.parse::<U256>().map_err(|e| {
				ConfigError::ValidationError(format!("Invalid executor balance: {}", e))
			})?;
		}

		Ok(())
	}

	fn validate_config(&self, config: &FlashConfig) -> Result<(), ConfigError> {
		let scenario = &config.scenario;

		if scenario.order.from_amount.is_zero() {
			return Err(ConfigError::ValidationError(
				"Order from_amount must be greater than zero".to_string(),
			));
		}

		if let Some(floor) = scenario.min_balance_after {
			if floor > scenario.executor_balance {
				return Err(ConfigError::ValidationError(format!(
					"min_balance_after {} exceeds executor_balance {}",
					floor, scenario.executor_balance
				)));
			}
		}

		if scenario.adapter == AdapterKind::Fixed && !scenario.max_extra_from_amount.is_zero() {
			return Err(ConfigError::ValidationError(
				"max_extra_from_amount only applies to the dynamic adapter".to_string(),
			));
		}

		Ok(())
	}
}
