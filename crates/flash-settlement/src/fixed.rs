//! Settlement of fully specified orders.

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolInterface;
use flash_chain::{CallContext, Contract};
use flash_types::{
	IFixedSettlementAdapter::{self, IFixedSettlementAdapterCalls},
	Revert,
};
use tracing::info;

use crate::guard::{
	ensure_balance_after, ensure_not_settled, ensure_settled, invoke_resolver, safe_transfer_from,
};

/// Settles an order whose hash and amount the caller already knows.
///
/// The adapter holds no state of its own. The amount moves straight from
/// the caller to the resolver, so it never holds funds across calls.
#[derive(Debug, Clone, Copy)]
pub struct FixedSettlementAdapter {
	receiver: Address,
}

impl FixedSettlementAdapter {
	pub fn new(receiver: Address) -> Self {
		Self { receiver }
	}

	fn receive_delegate_asset(
		&self,
		ctx: &mut CallContext<'_>,
		call: IFixedSettlementAdapter::receiveDelegateAssetCall,
	) -> Result<Bytes, Revert> {
		let caller = ctx.caller();
		let order_hash = call.orderHash;

		ensure_not_settled(ctx, self.receiver, order_hash)?;
		safe_transfer_from(ctx, call.token, caller, call.resolver, call.amount)?;
		ensure_balance_after(ctx, call.token, caller, call.minBalanceAfter)?;
		invoke_resolver(ctx, call.resolver, &call.resolverData)?;
		ensure_settled(ctx, self.receiver, order_hash)?;

		ctx.emit(&IFixedSettlementAdapter::Settled {
			orderHash: order_hash,
		});
		info!(
			"Settled order {} for {} of token {} via resolver {}",
			order_hash, call.amount, call.token, call.resolver
		);
		Ok(Bytes::new())
	}
}

impl Contract for FixedSettlementAdapter {
	fn name(&self) -> &str {
		"FixedSettlementAdapter"
	}

	fn call(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Bytes, Revert> {
		match IFixedSettlementAdapterCalls::abi_decode(input).map_err(|_| Revert::empty())? {
			IFixedSettlementAdapterCalls::receiveDelegateAsset(call) => {
				self.receive_delegate_asset(ctx, call)
			}
		}
	}
}
