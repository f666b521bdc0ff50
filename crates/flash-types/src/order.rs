//! Order identity and layout constants.

use alloy_primitives::{B256, U256};

use crate::Order;

/// EIP-712 digest identifying an order on-chain.
pub type OrderHash = B256;

/// Fixed-point output/input ratio scaled by 10^36. Zero means "undefined".
pub type Rate = U256;

/// Number of 32-byte slots an encoded [`Order`] occupies.
pub const ORDER_SLOT_COUNT: usize = 18;

/// Size in bytes of an encoded [`Order`].
pub const ORDER_ENCODED_SIZE: usize = ORDER_SLOT_COUNT * 32;

/// Slot index of `fromAmount` inside an encoded order.
pub const FROM_AMOUNT_SLOT: usize = 4;

/// Slot index of `toAmount` inside an encoded order.
pub const TO_AMOUNT_SLOT: usize = 8;

impl Order {
	/// Returns a copy of this order with both amounts replaced.
	pub fn with_amounts(&self, from_amount: U256, to_amount: U256) -> Self {
		Self {
			fromAmount: from_amount,
			toAmount: to_amount,
			..self.clone()
		}
	}
}
