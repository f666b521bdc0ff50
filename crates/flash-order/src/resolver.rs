//! Dynamic resolver descriptor and raw payload extraction.
//!
//! A descriptor packs `offset (12 bytes) ‖ resolver address (20 bytes)` into
//! one word. Every [`Order`] member is fixed width, so an order passed as a
//! call argument always sits in the static head of the calldata at a
//! position fixed by the argument list alone; dynamic arguments in front of
//! it contribute only a head pointer. Knowing that offset is enough to read
//! the order back out of calldata whose full signature is unknown.

use alloy_primitives::{Address, B256, U256};
use flash_types::{
	IFlashErrors, Order, OrderHash, Revert, FROM_AMOUNT_SLOT, ORDER_ENCODED_SIZE, TO_AMOUNT_SLOT,
};
use thiserror::Error;

use crate::hash_order;

/// Largest offset representable in the 12 high bytes of a descriptor.
pub const MAX_ORDER_OFFSET: u128 = (1u128 << 96) - 1;

const WORD: usize = 32;
const ADDRESS_BYTES: usize = 20;
const OFFSET_BYTES: usize = WORD - ADDRESS_BYTES;

/// The payload ends before the full order does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Truncated payload: order at offset {offset} needs {required} bytes, payload has {actual}")]
pub struct TruncatedPayload {
	pub offset: u128,
	pub required: u128,
	pub actual: usize,
}

impl From<TruncatedPayload> for Revert {
	fn from(error: TruncatedPayload) -> Self {
		Revert::from_error(IFlashErrors::TruncatedPayload {
			offset: U256::from(error.offset),
			required: U256::from(error.required),
			actual: U256::from(error.actual),
		})
	}
}

/// Errors that can occur while building or reading a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
	#[error("Order offset {0} does not fit 96 bits")]
	OffsetOutOfRange(u128),
	#[error(transparent)]
	Truncated(#[from] TruncatedPayload),
}

/// A resolver address and the byte offset of its embedded order, packed
/// into one word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DynamicResolver(B256);

impl DynamicResolver {
	/// Packs `offset` into the high 12 bytes and `resolver` into the low 20.
	pub fn encode(resolver: Address, offset: u128) -> Result<Self, CodecError> {
		if offset > MAX_ORDER_OFFSET {
			return Err(CodecError::OffsetOutOfRange(offset));
		}

		let mut word = [0u8; WORD];
		word[..OFFSET_BYTES].copy_from_slice(&offset.to_be_bytes()[16 - OFFSET_BYTES..]);
		word[OFFSET_BYTES..].copy_from_slice(resolver.as_slice());
		Ok(Self(B256::from(word)))
	}

	/// Wraps a descriptor word received as a call argument.
	pub const fn from_word(word: B256) -> Self {
		Self(word)
	}

	pub const fn word(&self) -> B256 {
		self.0
	}

	/// Resolver address in the low 20 bytes.
	pub fn resolver(&self) -> Address {
		Address::from_slice(&self.0[OFFSET_BYTES..])
	}

	/// Order offset in the high 12 bytes.
	pub fn offset(&self) -> u128 {
		let mut bytes = [0u8; 16];
		bytes[16 - OFFSET_BYTES..].copy_from_slice(&self.0[..OFFSET_BYTES]);
		u128::from_be_bytes(bytes)
	}

	/// Reads the order embedded in `payload` at [`Self::offset`].
	pub fn extract_order(&self, payload: &[u8]) -> Result<Order, TruncatedPayload> {
		let start = self.order_start(payload.len())?;
		let mut cursor = SlotCursor::new(payload, start);
		let truncated = self.truncated(payload.len());

		Ok(Order {
			fromActor: cursor.read_address().ok_or(truncated)?,
			fromActorReceiver: cursor.read_address().ok_or(truncated)?,
			fromChain: cursor.read_u256().ok_or(truncated)?,
			fromToken: cursor.read_address().ok_or(truncated)?,
			fromAmount: cursor.read_u256().ok_or(truncated)?,
			toActor: cursor.read_address().ok_or(truncated)?,
			toChain: cursor.read_u256().ok_or(truncated)?,
			toToken: cursor.read_address().ok_or(truncated)?,
			toAmount: cursor.read_u256().ok_or(truncated)?,
			collateralReceiver: cursor.read_address().ok_or(truncated)?,
			collateralChain: cursor.read_u256().ok_or(truncated)?,
			collateralAmount: cursor.read_u256().ok_or(truncated)?,
			collateralRewardable: cursor.read_u256().ok_or(truncated)?,
			collateralUnlocked: cursor.read_u256().ok_or(truncated)?,
			deadline: cursor.read_u256().ok_or(truncated)?,
			timeToSend: cursor.read_u256().ok_or(truncated)?,
			timeToLiqSend: cursor.read_u256().ok_or(truncated)?,
			nonce: cursor.read_u256().ok_or(truncated)?,
		})
	}

	/// Hash of the order embedded in `payload`.
	pub fn hash_order(&self, payload: &[u8]) -> Result<OrderHash, TruncatedPayload> {
		Ok(hash_order(&self.extract_order(payload)?))
	}

	/// Overwrites the `fromAmount` and `toAmount` slots of the embedded order.
	pub fn patch_amounts(
		&self,
		payload: &mut [u8],
		from_amount: U256,
		to_amount: U256,
	) -> Result<(), TruncatedPayload> {
		let start = self.order_start(payload.len())?;
		let from = start + FROM_AMOUNT_SLOT * WORD;
		let to = start + TO_AMOUNT_SLOT * WORD;
		payload[from..from + WORD].copy_from_slice(&from_amount.to_be_bytes::<WORD>());
		payload[to..to + WORD].copy_from_slice(&to_amount.to_be_bytes::<WORD>());
		Ok(())
	}

	/// Start of the order in a payload of `len` bytes, checking that the
	/// whole order fits.
	fn order_start(&self, len: usize) -> Result<usize, TruncatedPayload> {
		let offset = self.offset();
		let end = offset + ORDER_ENCODED_SIZE as u128;
		if end > len as u128 {
			return Err(self.truncated(len));
		}
		// end <= len, so the offset fits usize.
		Ok(offset as usize)
	}

	fn truncated(&self, len: usize) -> TruncatedPayload {
		let offset = self.offset();
		TruncatedPayload {
			offset,
			required: offset + ORDER_ENCODED_SIZE as u128,
			actual: len,
		}
	}
}

impl From<B256> for DynamicResolver {
	fn from(word: B256) -> Self {
		Self(word)
	}
}

impl From<DynamicResolver> for B256 {
	fn from(descriptor: DynamicResolver) -> Self {
		descriptor.0
	}
}

/// Bounds-checked reader of consecutive 32-byte slots.
#[derive(Debug, Clone)]
pub struct SlotCursor<'a> {
	data: &'a [u8],
	position: usize,
}

impl<'a> SlotCursor<'a> {
	pub fn new(data: &'a [u8], position: usize) -> Self {
		Self { data, position }
	}

	pub fn position(&self) -> usize {
		self.position
	}

	/// Reads the next slot, or `None` if it extends past the data.
	pub fn read_word(&mut self) -> Option<B256> {
		let end = self.position.checked_add(WORD)?;
		let slot = self.data.get(self.position..end)?;
		self.position = end;
		Some(B256::from_slice(slot))
	}

	pub fn read_u256(&mut self) -> Option<U256> {
		self.read_word().map(|word| U256::from_be_bytes(word.0))
	}

	/// Reads a slot as an address, keeping its low 20 bytes.
	pub fn read_address(&mut self) -> Option<Address> {
		self.read_word()
			.map(|word| Address::from_slice(&word[OFFSET_BYTES..]))
	}
}
