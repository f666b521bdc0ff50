//! Typed views over word storage.
//!
//! Storage is a flat map of 32-byte slots. Mappings follow the Solidity
//! layout: the value for `key` in the mapping declared at slot `p` lives at
//! `keccak256(key ‖ p)`.

use alloy_primitives::{keccak256, Address, B256, U256};

/// Slot of the state variable declared at position `index`.
pub fn slot(index: u64) -> B256 {
	B256::from(U256::from(index).to_be_bytes::<32>())
}

/// Slot holding `key` in the mapping rooted at `base`.
pub fn mapping_slot(key: B256, base: B256) -> B256 {
	let mut preimage = [0u8; 64];
	preimage[..32].copy_from_slice(key.as_slice());
	preimage[32..].copy_from_slice(base.as_slice());
	keccak256(preimage)
}

/// Conversion between a value and its storage word.
pub trait StorageWord: Sized {
	fn to_word(&self) -> B256;
	fn from_word(word: B256) -> Self;
}

impl StorageWord for B256 {
	fn to_word(&self) -> B256 {
		*self
	}

	fn from_word(word: B256) -> Self {
		word
	}
}

impl StorageWord for U256 {
	fn to_word(&self) -> B256 {
		B256::from(self.to_be_bytes::<32>())
	}

	fn from_word(word: B256) -> Self {
		U256::from_be_bytes(word.0)
	}
}

impl StorageWord for Address {
	fn to_word(&self) -> B256 {
		self.into_word()
	}

	fn from_word(word: B256) -> Self {
		Address::from_word(word)
	}
}

impl StorageWord for bool {
	fn to_word(&self) -> B256 {
		if *self {
			B256::with_last_byte(1)
		} else {
			B256::ZERO
		}
	}

	fn from_word(word: B256) -> Self {
		!word.is_zero()
	}
}
