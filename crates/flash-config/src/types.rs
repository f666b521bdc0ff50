//! Configuration types.

use std::fmt;

use alloy_primitives::{Address, U256};
use flash_settlement::TopUpPolicy;
use flash_types::Order;
use serde::{Deserialize, Serialize};

use crate::serde_helpers::{deserialize_opt_u256, deserialize_u256};

/// Complete configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FlashConfig {
	/// Log output settings
	#[serde(default)]
	pub logging: LoggingConfig,
	/// Settlement scenario run by `simulate`
	pub scenario: ScenarioConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
	/// Default filter directive, e.g. `info` or `flash_settlement=debug`
	#[serde(default = "default_log_level")]
	pub level: String,
	#[serde(default)]
	pub format: LogFormat,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: default_log_level(),
			format: LogFormat::default(),
		}
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Pretty,
	Json,
}

impl std::str::FromStr for LogFormat {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"pretty" => Ok(LogFormat::Pretty),
			"json" => Ok(LogFormat::Json),
			other => Err(format!("Unknown log format '{}'", other)),
		}
	}
}

/// Which settlement adapter a scenario drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
	Fixed,
	Dynamic,
}

impl fmt::Display for AdapterKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AdapterKind::Fixed => write!(f, "fixed"),
			AdapterKind::Dynamic => write!(f, "dynamic"),
		}
	}
}

/// One end-to-end settlement: deploy the contracts, fund the executor, and
/// submit an approve + receive batch.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioConfig {
	pub adapter: AdapterKind,
	/// Only used by the dynamic adapter
	#[serde(default)]
	pub top_up_policy: TopUpPolicy,
	/// Tokens minted to the executor before the batch
	#[serde(deserialize_with = "deserialize_u256")]
	pub executor_balance: U256,
	/// Only used by the dynamic adapter
	#[serde(default, deserialize_with = "deserialize_u256")]
	pub max_extra_from_amount: U256,
	/// Defaults to the executor balance minus the largest possible payment
	#[serde(default, deserialize_with = "deserialize_opt_u256")]
	pub min_balance_after: Option<U256>,
	/// Byte offset of the order in the resolver payload: 4, 36 or 100
	#[serde(default = "default_order_offset")]
	pub order_offset: u64,
	#[serde(default)]
	pub resolver: ResolverBehavior,
	pub order: ScenarioOrder,
}

fn default_order_offset() -> u64 {
	4
}

/// Scripted resolver behavior.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct ResolverBehavior {
	#[serde(default)]
	pub should_revert: bool,
	#[serde(default)]
	pub ignore_receive: bool,
}

/// Order terms. The actor and token addresses are filled in from the
/// deployed contracts.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioOrder {
	#[serde(default)]
	pub from_actor_receiver: Address,
	#[serde(default, deserialize_with = "deserialize_u256")]
	pub from_chain: U256,
	#[serde(deserialize_with = "deserialize_u256")]
	pub from_amount: U256,
	#[serde(default, deserialize_with = "deserialize_u256")]
	pub to_chain: U256,
	#[serde(default)]
	pub to_token: Address,
	#[serde(deserialize_with = "deserialize_u256")]
	pub to_amount: U256,
	#[serde(default)]
	pub collateral_receiver: Address,
	#[serde(default, deserialize_with = "deserialize_u256")]
	pub collateral_chain: U256,
	#[serde(default, deserialize_with = "deserialize_u256")]
	pub collateral_amount: U256,
	#[serde(default, deserialize_with = "deserialize_u256")]
	pub collateral_rewardable: U256,
	#[serde(default, deserialize_with = "deserialize_u256")]
	pub collateral_unlocked: U256,
	#[serde(default, deserialize_with = "deserialize_u256")]
	pub deadline: U256,
	#[serde(default, deserialize_with = "deserialize_u256")]
	pub time_to_send: U256,
	#[serde(default, deserialize_with = "deserialize_u256")]
	pub time_to_liq_send: U256,
	#[serde(default, deserialize_with = "deserialize_u256")]
	pub nonce: U256,
}

impl ScenarioOrder {
	/// Builds the order paid out of `from_actor` in `from_token` to `to_actor`.
	pub fn to_order(&self, from_actor: Address, from_token: Address, to_actor: Address) -> Order {
		Order {
			fromActor: from_actor,
			fromActorReceiver: self.from_actor_receiver,
			fromChain: self.from_chain,
			fromToken: from_token,
			fromAmount: self.from_amount,
			toActor: to_actor,
			toChain: self.to_chain,
			toToken: self.to_token,
			toAmount: self.to_amount,
			collateralReceiver: self.collateral_receiver,
			collateralChain: self.collateral_chain,
			collateralAmount: self.collateral_amount,
			collateralRewardable: self.collateral_rewardable,
			collateralUnlocked: self.collateral_unlocked,
			deadline: self.deadline,
			timeToSend: self.time_to_send,
			timeToLiqSend: self.time_to_liq_send,
			nonce: self.nonce,
		}
	}
}
