//! Settlement of orders topped up at execution time.
//!
//! The caller declares a base order inside the resolver payload and a cap
//! on how much it may add to the base `fromAmount`. The adapter picks the
//! extra amount, scales `toAmount` by the base order's rate so the committed
//! exchange rate holds, and settles the resulting final order. Before the
//! resolver runs, the final amounts are written back into its payload so the
//! resolver acknowledges the order that was actually paid for.

use std::fmt;

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{SolInterface, SolValue};
use flash_chain::{mapping_slot, slot, CallContext, Contract};
use flash_order::{hash_order, DynamicResolver};
use flash_rate::{apply_rate, calc_rate, RateError};
use flash_types::{
	IDynamicSettlementAdapter::{self, IDynamicSettlementAdapterCalls},
	IFlashErrors, Order, OrderHash, Revert,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::guard::{
	balance_of, ensure_balance_after, ensure_not_settled, ensure_settled, invoke_resolver,
	safe_transfer_from,
};

/// How the extra `fromAmount` is chosen within `[0, maxExtraFromAmount]`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopUpPolicy {
	/// Take whatever the caller holds beyond the base amount, up to the cap.
	#[default]
	SweepAvailable,
	/// Always take the full cap.
	Maximum,
}

impl TopUpPolicy {
	/// Extra amount to add on top of `base_amount` given the caller's
	/// `available` balance.
	pub fn extra_amount(&self, max_extra: U256, available: U256, base_amount: U256) -> U256 {
		match self {
			TopUpPolicy::SweepAvailable => max_extra.min(available.saturating_sub(base_amount)),
			TopUpPolicy::Maximum => max_extra,
		}
	}
}

impl fmt::Display for TopUpPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TopUpPolicy::SweepAvailable => write!(f, "sweep_available"),
			TopUpPolicy::Maximum => write!(f, "maximum"),
		}
	}
}

/// Final order derived from a base order and an extra amount.
///
/// The rate is taken from the base order and always reapplied, even when
/// `extra` is zero.
pub fn final_order(base: &Order, extra: U256) -> Result<Order, RateError> {
	let from_amount = base
		.fromAmount
		.checked_add(extra)
		.ok_or(RateError::Overflow)?;
	let rate = calc_rate(base.fromAmount, base.toAmount)?;
	let to_amount = apply_rate(from_amount, rate)?;
	Ok(base.with_amounts(from_amount, to_amount))
}

fn rate_overflow(_: RateError) -> Revert {
	Revert::from_error(IFlashErrors::RateOverflow {})
}

/// Dynamic settlement adapter.
///
/// Keeps `mapping(bytes32 baseOrderHash => bytes32 orderHash)` at slot 0 for
/// lookup. Each base order hash can be recorded once: a different final
/// order settled under an already recorded base hash reverts with
/// `AlreadyReceived`.
#[derive(Debug, Clone, Copy)]
pub struct DynamicSettlementAdapter {
	receiver: Address,
	top_up_policy: TopUpPolicy,
}

impl DynamicSettlementAdapter {
	pub fn new(receiver: Address) -> Self {
		Self::with_policy(receiver, TopUpPolicy::default())
	}

	pub fn with_policy(receiver: Address, top_up_policy: TopUpPolicy) -> Self {
		Self {
			receiver,
			top_up_policy,
		}
	}

	fn record_slot(base_order_hash: OrderHash) -> B256 {
		mapping_slot(base_order_hash, slot(0))
	}

	fn receive_delegate_asset(
		&self,
		ctx: &mut CallContext<'_>,
		call: IDynamicSettlementAdapter::receiveDelegateAssetCall,
	) -> Result<Bytes, Revert> {
		let caller = ctx.caller();
		let base_order_hash = call.baseOrderHash;
		let descriptor = DynamicResolver::from_word(call.resolverDescriptor);
		let base = descriptor.extract_order(&call.resolverData)?;

		let available = balance_of(ctx, base.fromToken, caller)?;
		let extra =
			self.top_up_policy
				.extra_amount(call.maxExtraFromAmount, available, base.fromAmount);
		let order = final_order(&base, extra).map_err(rate_overflow)?;
		let order_hash = hash_order(&order);
		debug!(
			"Resolved dynamic order {} to {} with extra amount {} ({} policy)",
			base_order_hash, order_hash, extra, self.top_up_policy
		);

		ensure_not_settled(ctx, self.receiver, order_hash)?;
		safe_transfer_from(ctx, base.fromToken, caller, base.toActor, order.fromAmount)?;
		ensure_balance_after(ctx, base.fromToken, caller, call.minBalanceAfter)?;

		let mut payload = call.resolverData.to_vec();
		descriptor.patch_amounts(&mut payload, order.fromAmount, order.toAmount)?;
		invoke_resolver(ctx, descriptor.resolver(), &payload)?;
		ensure_settled(ctx, self.receiver, order_hash)?;

		// Write-once. A replayed final order never gets here; it fails
		// `ensure_not_settled` with `AlreadySettled`.
		let record_slot = Self::record_slot(base_order_hash);
		if !ctx.load::<B256>(record_slot).is_zero() {
			return Err(Revert::from_error(IFlashErrors::AlreadyReceived {
				baseOrderHash: base_order_hash,
			}));
		}
		ctx.store(record_slot, order_hash);
		ctx.emit(&IDynamicSettlementAdapter::DynamicSettled {
			baseOrderHash: base_order_hash,
			orderHash: order_hash,
		});
		info!(
			"Settled dynamic order {} as {} for {} of token {}",
			base_order_hash, order_hash, order.fromAmount, base.fromToken
		);
		Ok(Bytes::new())
	}
}

impl Contract for DynamicSettlementAdapter {
	fn name(&self) -> &str {
		"DynamicSettlementAdapter"
	}

	fn call(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Bytes, Revert> {
		match IDynamicSettlementAdapterCalls::abi_decode(input).map_err(|_| Revert::empty())? {
			IDynamicSettlementAdapterCalls::receiveDelegateAsset(call) => {
				self.receive_delegate_asset(ctx, call)
			}
			IDynamicSettlementAdapterCalls::receivedOrderHash(call) => {
				let order_hash: B256 = ctx.load(Self::record_slot(call.baseOrderHash));
				Ok(order_hash.abi_encode().into())
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn n(value: u64) -> U256 {
		U256::from(value)
	}

	#[test]
	fn test_sweep_takes_available_up_to_cap() {
		let policy = TopUpPolicy::SweepAvailable;
		// Plenty available: capped.
		assert_eq!(policy.extra_amount(n(100), n(10_000), n(500)), n(100));
		// Some available: everything beyond the base.
		assert_eq!(policy.extra_amount(n(100), n(540), n(500)), n(40));
		// Less than the base: nothing extra.
		assert_eq!(policy.extra_amount(n(100), n(400), n(500)), U256::ZERO);
		assert_eq!(policy.extra_amount(U256::ZERO, n(10_000), n(500)), U256::ZERO);
	}

	#[test]
	fn test_maximum_ignores_balance() {
		assert_eq!(
			TopUpPolicy::Maximum.extra_amount(n(100), U256::ZERO, n(500)),
			n(100)
		);
	}

	#[test]
	fn test_final_order_keeps_rate() {
		let base = Order {
			fromAmount: n(444_222),
			toAmount: n(888_444),
			nonce: n(3),
			..Default::default()
		};

		let order = final_order(&base, n(100_000)).unwrap();
		assert_eq!(order.fromAmount, n(544_222));
		assert_eq!(order.toAmount, n(1_088_444));
		assert_eq!(order.nonce, base.nonce);
	}

	#[test]
	fn test_final_order_with_zero_extra_rounds_down() {
		let base = Order {
			fromAmount: n(3),
			toAmount: n(1),
			..Default::default()
		};
		let order = final_order(&base, U256::ZERO).unwrap();
		assert_eq!(order.fromAmount, n(3));
		// floor(3 * floor(10^36 / 3) / 10^36) == 0
		assert_eq!(order.toAmount, U256::ZERO);
	}

	#[test]
	fn test_final_order_from_zero_base_has_zero_to_amount() {
		let base = Order {
			fromAmount: U256::ZERO,
			toAmount: n(50),
			..Default::default()
		};
		let order = final_order(&base, n(10)).unwrap();
		assert_eq!(order.fromAmount, n(10));
		assert_eq!(order.toAmount, U256::ZERO);
	}

	#[test]
	fn test_final_order_overflow() {
		let base = Order {
			fromAmount: U256::MAX,
			toAmount: n(1),
			..Default::default()
		};
		assert_eq!(final_order(&base, n(1)), Err(RateError::Overflow));
	}

	#[test]
	fn test_policy_serde_names() {
		#[derive(Deserialize)]
		struct Wrapper {
			policy: TopUpPolicy,
		}
		let parsed: Wrapper = toml::from_str("policy = \"maximum\"").unwrap();
		assert_eq!(parsed.policy, TopUpPolicy::Maximum);
		assert_eq!(TopUpPolicy::SweepAvailable.to_string(), "sweep_available");
	}
}
