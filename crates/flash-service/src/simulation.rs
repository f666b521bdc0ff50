//! End-to-end settlement scenario on an in-memory chain.
//!
//! Deploys the token, order receiver, resolver, call executor and the
//! configured adapter, mints the executor's balance, and submits one
//! `approve` + `receiveDelegateAsset` batch from an outside account. A
//! reverted batch is a normal outcome and is reported, not returned as an
//! error.

use std::fmt;

use alloy_primitives::{address, Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolEvent, SolValue};
use anyhow::{bail, Context, Result};
use flash_chain::{Chain, ChainError, Receipt};
use flash_config::{AdapterKind, ScenarioConfig};
use flash_executor::{Batch, CallExecutor};
use flash_ledger::{Erc20Token, OrderReceiver, ResolverFlow, ResolverMock};
use flash_order::{hash_order, DynamicResolver};
use flash_settlement::{DynamicSettlementAdapter, FixedSettlementAdapter};
use flash_types::{
	IDynamicSettlementAdapter, IFixedSettlementAdapter, IOrderReceiver, IResolverMock, Order,
	IERC20,
};
use serde::Serialize;
use tracing::{info, warn};

/// Externally owned account that submits the batch.
pub const SUBMITTER: Address = address!("5b5b5b5b5b5b5b5b5b5b5b5b5b5b5b5b5b5b5b5b");

/// Contracts deployed for one scenario run.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Deployment {
	pub executor: Address,
	pub token: Address,
	pub receiver: Address,
	pub resolver: Address,
	pub adapter: Address,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
	Settled,
	Reverted(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
	pub adapter: AdapterKind,
	pub deployment: Deployment,
	/// Hash of the order as submitted
	pub base_order_hash: B256,
	/// Hash of the order that was actually settled, if any
	pub order_hash: Option<B256>,
	pub outcome: Outcome,
	pub executor_balance_before: U256,
	pub executor_balance_after: U256,
	pub resolver_balance: U256,
	/// Decoded events in emission order
	pub events: Vec<String>,
}

impl SimulationReport {
	pub fn is_settled(&self) -> bool {
		matches!(self.outcome, Outcome::Settled)
	}
}

impl fmt::Display for SimulationReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Adapter:          {} ({})", self.adapter, self.deployment.adapter)?;
		writeln!(f, "Base order hash:  {}", self.base_order_hash)?;
		match &self.order_hash {
			Some(hash) => writeln!(f, "Settled order:    {}", hash)?,
			None => writeln!(f, "Settled order:    -")?,
		}
		match &self.outcome {
			Outcome::Settled => writeln!(f, "Outcome:          settled")?,
			Outcome::Reverted(reason) => writeln!(f, "Outcome:          {}", reason)?,
		}
		writeln!(
			f,
			"Executor balance: {} -> {}",
			self.executor_balance_before, self.executor_balance_after
		)?;
		writeln!(f, "Resolver balance: {}", self.resolver_balance)?;
		for event in &self.events {
			writeln!(f, "  {}", event)?;
		}
		Ok(())
	}
}

/// Runs `scenario` to completion.
pub fn run(scenario: &ScenarioConfig) -> Result<SimulationReport> {
	let mut chain = Chain::new();
	let deployment = deploy(&mut chain, scenario);

	let mint = IERC20::mintCall {
		account: deployment.executor,
		value: scenario.executor_balance,
	};
	chain
		.transact(SUBMITTER, deployment.token, U256::ZERO, &mint.abi_encode())
		.context("Failed to fund executor")?;

	let base_order =
		scenario
			.order
			.to_order(deployment.adapter, deployment.token, deployment.resolver);
	let base_order_hash = hash_order(&base_order);
	let flow = ResolverFlow {
		should_revert: scenario.resolver.should_revert,
		ignore_receive: scenario.resolver.ignore_receive,
	};
	let payload = resolver_payload(&base_order, flow, scenario.order_offset)?;

	let min_balance_after = scenario.min_balance_after.unwrap_or_else(|| {
		scenario
			.executor_balance
			.saturating_sub(base_order.fromAmount.saturating_add(scenario.max_extra_from_amount))
	});

	let batch = Batch::new()
		.call(
			deployment.token,
			&IERC20::approveCall {
				spender: deployment.adapter,
				value: U256::MAX,
			},
		)
		.tolerant();
	let batch = match scenario.adapter {
		AdapterKind::Fixed => batch.call(
			deployment.adapter,
			&IFixedSettlementAdapter::receiveDelegateAssetCall {
				token: deployment.token,
				amount: base_order.fromAmount,
				minBalanceAfter: min_balance_after,
				orderHash: base_order_hash,
				resolver: deployment.resolver,
				resolverData: payload,
			},
		),
		AdapterKind::Dynamic => {
			let descriptor =
				DynamicResolver::encode(deployment.resolver, u128::from(scenario.order_offset))
					.context("Invalid resolver descriptor")?;
			batch.call(
				deployment.adapter,
				&IDynamicSettlementAdapter::receiveDelegateAssetCall {
					maxExtraFromAmount: scenario.max_extra_from_amount,
					minBalanceAfter: min_balance_after,
					baseOrderHash: base_order_hash,
					resolverDescriptor: descriptor.word(),
					resolverData: payload,
				},
			)
		}
	};

	info!(
		"Submitting {} settlement batch for order {}",
		scenario.adapter, base_order_hash
	);
	let (outcome, receipt) = match chain.transact(
		SUBMITTER,
		deployment.executor,
		U256::ZERO,
		&batch.encode(),
	) {
		Ok(receipt) => (Outcome::Settled, receipt),
		Err(ChainError::Reverted(revert)) => {
			warn!("Settlement reverted: {}", revert);
			(Outcome::Reverted(revert.to_string()), Receipt::default())
		}
		Err(e) => return Err(e).context("Failed to submit settlement batch"),
	};

	let order_hash = match (&outcome, scenario.adapter) {
		(Outcome::Reverted(_), _) => None,
		(Outcome::Settled, AdapterKind::Fixed) => Some(base_order_hash),
		(Outcome::Settled, AdapterKind::Dynamic) => receipt
			.events::<IDynamicSettlementAdapter::DynamicSettled>()
			.first()
			.map(|(_, event)| event.orderHash),
	};

	Ok(SimulationReport {
		adapter: scenario.adapter,
		deployment,
		base_order_hash,
		order_hash,
		outcome,
		executor_balance_before: scenario.executor_balance,
		executor_balance_after: balance_of(&mut chain, &deployment, deployment.executor)?,
		resolver_balance: balance_of(&mut chain, &deployment, deployment.resolver)?,
		events: describe_events(&receipt, &deployment),
	})
}

fn deploy(chain: &mut Chain, scenario: &ScenarioConfig) -> Deployment {
	let receiver = chain.deploy(OrderReceiver::new());
	let resolver = chain.deploy(ResolverMock::new(receiver));
	let adapter = match scenario.adapter {
		AdapterKind::Fixed => chain.deploy(FixedSettlementAdapter::new(receiver)),
		AdapterKind::Dynamic => chain.deploy(DynamicSettlementAdapter::with_policy(
			receiver,
			scenario.top_up_policy,
		)),
	};
	let executor = chain.deploy(CallExecutor::new());
	let token = chain.deploy(Erc20Token::new("FlashToken"));

	Deployment {
		executor,
		token,
		receiver,
		resolver,
		adapter,
	}
}

/// Resolver calldata embedding `order` at byte `offset`.
pub fn resolver_payload(order: &Order, flow: ResolverFlow, offset: u64) -> Result<Bytes> {
	let payload = match offset {
		4 => IResolverMock::receiveOrderCall {
			order: order.clone(),
			flowFlags: flow.flags(),
		}
		.abi_encode(),
		36 => IResolverMock::receiveOrderOffset36Call {
			prefix: B256::ZERO,
			order: order.clone(),
			flowFlags: flow.flags(),
			suffix: B256::ZERO,
		}
		.abi_encode(),
		100 => IResolverMock::receiveOrderOffset100Call {
			prefix: B256::ZERO,
			extra: Bytes::new(),
			tag: U256::ZERO,
			order: order.clone(),
			flowFlags: flow.flags(),
			suffix: B256::ZERO,
		}
		.abi_encode(),
		other => bail!("No resolver entry point places the order at offset {}", other),
	};
	Ok(payload.into())
}

fn balance_of(chain: &mut Chain, deployment: &Deployment, account: Address) -> Result<U256> {
	let call = IERC20::balanceOfCall { account };
	let output = chain
		.view(SUBMITTER, deployment.token, &call.abi_encode())
		.context("Failed to read token balance")?;
	U256::abi_decode(&output).context("Malformed balanceOf output")
}

fn describe_events(receipt: &Receipt, deployment: &Deployment) -> Vec<String> {
	let name = |address: Address| -> String {
		match address {
			a if a == deployment.executor => "executor".to_string(),
			a if a == deployment.token => "token".to_string(),
			a if a == deployment.receiver => "receiver".to_string(),
			a if a == deployment.resolver => "resolver".to_string(),
			a if a == deployment.adapter => "adapter".to_string(),
			a => a.to_string(),
		}
	};

	receipt
		.logs
		.iter()
		.map(|log| {
			let emitter = name(log.address);
			if let Ok(e) = IERC20::Transfer::decode_log_data(&log.data) {
				format!("{}: Transfer({} -> {}, {})", emitter, name(e.from), name(e.to), e.value)
			} else if let Ok(e) = IERC20::Approval::decode_log_data(&log.data) {
				format!("{}: Approval({} -> {}, {})", emitter, name(e.owner), name(e.spender), e.value)
			} else if let Ok(e) = IOrderReceiver::OrderSettled::decode_log_data(&log.data) {
				format!("{}: OrderSettled({}, {})", emitter, e.orderHash, name(e.resolver))
			} else if let Ok(e) = IFixedSettlementAdapter::Settled::decode_log_data(&log.data) {
				format!("{}: Settled({})", emitter, e.orderHash)
			} else if let Ok(e) =
				IDynamicSettlementAdapter::DynamicSettled::decode_log_data(&log.data)
			{
				format!("{}: DynamicSettled({}, {})", emitter, e.baseOrderHash, e.orderHash)
			} else {
				format!("{}: <unknown log>", emitter)
			}
		})
		.collect()
}
