//! Order receipt ledger.

use alloy_primitives::{Bytes, B256};
use alloy_sol_types::{SolInterface, SolValue};
use flash_chain::{mapping_slot, slot, CallContext, Contract};
use flash_types::{
	IFlashErrors,
	IOrderReceiver::{self, IOrderReceiverCalls},
	OrderHash, Revert,
};

/// Holds one settled flag per order hash in `mapping(bytes32 => bool)` at
/// slot 0. A flag goes from false to true once and never back; marking an
/// order twice reverts with `AlreadySettled`.
///
/// Anyone may mark an order. Resolvers are expected to do so from inside
/// their callback, which the adapters then verify.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderReceiver;

impl OrderReceiver {
	pub fn new() -> Self {
		Self
	}

	fn settled_slot(order_hash: OrderHash) -> B256 {
		mapping_slot(order_hash, slot(0))
	}
}

impl Contract for OrderReceiver {
	fn name(&self) -> &str {
		"OrderReceiver"
	}

	fn call(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Bytes, Revert> {
		match IOrderReceiverCalls::abi_decode(input).map_err(|_| Revert::empty())? {
			IOrderReceiverCalls::settled(c) => {
				let settled: bool = ctx.load(Self::settled_slot(c.orderHash));
				Ok(settled.abi_encode().into())
			}
			IOrderReceiverCalls::markSettled(c) => {
				let slot = Self::settled_slot(c.orderHash);
				if ctx.load::<bool>(slot) {
					return Err(Revert::from_error(IFlashErrors::AlreadySettled {
						orderHash: c.orderHash,
					}));
				}
				ctx.store(slot, true);
				ctx.emit(&IOrderReceiver::OrderSettled {
					orderHash: c.orderHash,
					resolver: ctx.caller(),
				});
				Ok(Bytes::new())
			}
		}
	}
}
