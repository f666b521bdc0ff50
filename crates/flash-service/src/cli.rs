//! Command-line interface definitions.

use std::path::PathBuf;

use alloy_primitives::{Address, B256, U256};
use clap::{Parser, Subcommand};
use flash_config::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "flash")]
#[command(about = "Flash settlement toolkit", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
	/// Path to configuration file
	#[arg(
		short,
		long,
		value_name = "FILE",
		env = "FLASH_CONFIG",
		default_value = "config/example.toml"
	)]
	pub config: PathBuf,

	/// Log filter override, e.g. `debug` or `flash_settlement=trace`
	#[arg(short, long, env = "FLASH_LOG_LEVEL")]
	pub log_level: Option<String>,

	/// Log output format override (pretty, json)
	#[arg(long, env = "FLASH_LOG_FORMAT")]
	pub log_format: Option<LogFormat>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Compute the EIP-712 hash of an order stored as JSON
	Hash {
		/// Order JSON file
		order: PathBuf,
	},

	/// Pack a resolver address and order offset into a descriptor word
	EncodeResolver {
		resolver: Address,
		offset: u128,
	},

	/// Split a descriptor word into resolver address and order offset
	DecodeResolver {
		descriptor: B256,
	},

	/// Read the order a descriptor points at inside resolver calldata
	Extract {
		descriptor: B256,
		/// Resolver calldata as hex
		payload: String,
	},

	/// Fixed-point rate arithmetic
	#[command(subcommand)]
	Rate(RateCommand),

	/// Run the configured settlement scenario end to end
	Simulate {
		/// Print the report as JSON
		#[arg(long)]
		json: bool,
	},

	/// Validate the configuration file
	Validate,
}

#[derive(Subcommand, Debug)]
pub enum RateCommand {
	/// Rate of `output` per `input`, scaled by 10^36
	Calc { input: U256, output: U256 },

	/// Amount received for `input` at `rate`
	Apply { input: U256, rate: U256 },
}

impl Command {
	pub fn needs_config(&self) -> bool {
		matches!(self, Command::Simulate { .. } | Command::Validate)
	}
}
