use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use flash_config::{AdapterKind, ConfigLoader, FlashConfig, LogFormat};
use flash_rate::{apply_rate, calc_rate};
use flash_service::cli::{Cli, Command, RateCommand};
use flash_service::inspect;
use flash_service::logging::{init_tracing, TracingConfig};
use flash_service::simulation;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	let config = if cli.command.needs_config() {
		Some(load_config(&cli.config).await?)
	} else {
		None
	};

	// CLI flags win over the config file
	let mut tracing_config = config
		.as_ref()
		.map(|config| TracingConfig::from(&config.logging))
		.unwrap_or_default();
	if let Some(level) = &cli.log_level {
		tracing_config = tracing_config.with_filter(level.clone());
	}
	if let Some(format) = cli.log_format {
		tracing_config = tracing_config.with_json_format(format == LogFormat::Json);
	}
	init_tracing(&tracing_config)?;

	match (cli.command, config) {
		(Command::Hash { order }, _) => {
			let json = tokio::fs::read_to_string(&order)
				.await
				.with_context(|| format!("Failed to read order file {:?}", order))?;
			println!("{}", inspect::order_hash_from_json(&json)?);
		}
		(Command::EncodeResolver { resolver, offset }, _) => {
			println!("{}", inspect::encode_resolver(resolver, offset)?);
		}
		(Command::DecodeResolver { descriptor }, _) => {
			let (resolver, offset) = inspect::decode_resolver(descriptor);
			println!("resolver: {}", resolver);
			println!("offset:   {}", offset);
		}
		(Command::Extract { descriptor, payload }, _) => {
			let payload = inspect::parse_hex(&payload)?;
			let (order, order_hash) = inspect::extract_order(descriptor, &payload)?;
			println!("{}", serde_json::to_string_pretty(&order)?);
			println!("order hash: {}", order_hash);
		}
		(Command::Rate(RateCommand::Calc { input, output }), _) => {
			println!("{}", calc_rate(input, output).context("Failed to compute rate")?);
		}
		(Command::Rate(RateCommand::Apply { input, rate }), _) => {
			println!("{}", apply_rate(input, rate).context("Failed to apply rate")?);
		}
		(Command::Simulate { json }, Some(config)) => {
			let report = simulation::run(&config.scenario).context("Simulation failed")?;
			if json {
				println!("{}", serde_json::to_string_pretty(&report)?);
			} else {
				print!("{}", report);
			}
		}
		(Command::Validate, Some(config)) => {
			let scenario = &config.scenario;
			info!("Configuration is valid");
			info!("Adapter: {}", scenario.adapter);
			info!("Executor balance: {}", scenario.executor_balance);
			info!("Order offset: {}", scenario.order_offset);
			if scenario.adapter == AdapterKind::Dynamic {
				info!("Top-up policy: {}", scenario.top_up_policy);
				info!("Max extra fromAmount: {}", scenario.max_extra_from_amount);
			}
		}
		(command, None) => anyhow::bail!("Command {:?} requires a configuration file", command),
	}

	Ok(())
}

async fn load_config(path: &Path) -> Result<FlashConfig> {
	ConfigLoader::new()
		.with_file(path)
		.load()
		.await
		.with_context(|| format!("Failed to load configuration from {:?}", path))
}
