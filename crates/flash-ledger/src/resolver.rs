//! Resolver used to exercise the settlement adapters.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolInterface;
use flash_chain::{CallContext, Contract};
use flash_order::hash_order;
use flash_types::{
	IOrderReceiver,
	IResolverMock::{self, IResolverMockCalls},
	Order, Revert,
};
use tracing::debug;

/// Behavior switches carried in the `flowFlags` argument.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolverFlow {
	/// Revert with `ResolverTestError()` (bit 0).
	pub should_revert: bool,
	/// Return without acknowledging the order (bit 1).
	pub ignore_receive: bool,
}

impl ResolverFlow {
	const REVERT: u64 = 1;
	const IGNORE_RECEIVE: u64 = 1 << 1;

	pub fn flags(&self) -> U256 {
		let mut flags = 0;
		if self.should_revert {
			flags |= Self::REVERT;
		}
		if self.ignore_receive {
			flags |= Self::IGNORE_RECEIVE;
		}
		U256::from(flags)
	}

	pub fn from_flags(flags: U256) -> Self {
		Self {
			should_revert: flags.bit(0),
			ignore_receive: flags.bit(1),
		}
	}
}

/// Resolver exposing the same order at byte offsets 4, 36 and 100 of its
/// calldata. Unless told otherwise it marks the EIP-712 hash of the order it
/// received as settled in its receiver.
#[derive(Debug, Clone, Copy)]
pub struct ResolverMock {
	receiver: Address,
}

impl ResolverMock {
	pub fn new(receiver: Address) -> Self {
		Self { receiver }
	}

	pub fn receiver(&self) -> Address {
		self.receiver
	}

	fn receive(
		&self,
		ctx: &mut CallContext<'_>,
		order: &Order,
		flow: ResolverFlow,
	) -> Result<Bytes, Revert> {
		if flow.should_revert {
			return Err(Revert::from_error(IResolverMock::ResolverTestError {}));
		}
		if flow.ignore_receive {
			debug!(resolver = %ctx.address(), "Ignoring received order");
			return Ok(Bytes::new());
		}

		let order_hash = hash_order(order);
		debug!(resolver = %ctx.address(), %order_hash, "Acknowledging received order");
		ctx.call_sol(
			self.receiver,
			&IOrderReceiver::markSettledCall {
				orderHash: order_hash,
			},
		)?;
		Ok(Bytes::new())
	}
}

impl Contract for ResolverMock {
	fn name(&self) -> &str {
		"ResolverMock"
	}

	fn call(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Bytes, Revert> {
		let (order, flags) = match IResolverMockCalls::abi_decode(input).map_err(|_| Revert::empty())? {
			IResolverMockCalls::receiveOrder(c) => (c.order, c.flowFlags),
			IResolverMockCalls::receiveOrderOffset36(c) => (c.order, c.flowFlags),
			IResolverMockCalls::receiveOrderOffset100(c) => (c.order, c.flowFlags),
		};
		self.receive(ctx, &order, ResolverFlow::from_flags(flags))
	}
}
