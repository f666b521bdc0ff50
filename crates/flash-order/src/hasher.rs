//! EIP-712 order hashing.
//!
//! The domain carries only a name and a version. It is not bound to a chain
//! id or verifying contract, so the same order hashes identically on every
//! chain it touches.

use std::sync::LazyLock;

use alloy_primitives::{keccak256, B256};
use alloy_sol_types::{eip712_domain, Eip712Domain, SolStruct};
use flash_types::{Order, OrderHash};

/// Protocol domain used for every order hash.
pub const FLASH_DOMAIN: Eip712Domain = eip712_domain! {
	name: "swaps-io/Flash",
	version: "1",
};

static DOMAIN_SEPARATOR: LazyLock<B256> = LazyLock::new(|| FLASH_DOMAIN.hash_struct());

/// Domain separator of [`FLASH_DOMAIN`], computed once per process.
pub fn domain_separator() -> B256 {
	*DOMAIN_SEPARATOR
}

/// Computes the on-chain identity of an order:
/// `keccak256(0x1901 ‖ domainSeparator ‖ hashStruct(order))`.
pub fn hash_order(order: &Order) -> OrderHash {
	let mut digest = [0u8; 66];
	digest[..2].copy_from_slice(&[0x19, 0x01]);
	digest[2..34].copy_from_slice(domain_separator().as_slice());
	digest[34..].copy_from_slice(order.eip712_hash_struct().as_slice());
	keccak256(digest)
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{address, b256, Address, U256};

	fn vector_order() -> Order {
		Order {
			fromActor: address!("deadbeefdeadbeefdeadbeefdeadbeefdeadbeef"),
			fromActorReceiver: address!("deadbeefdeadbeefdeadbeefdeadbeefdeadbeef"),
			fromChain: U256::from(512u64),
			fromToken: address!("0101010101010101010101010101010101010101"),
			fromAmount: U256::from(1234u64),
			toActor: address!("deadc0dedeadc0dedeadc0dedeadc0dedeadc0de"),
			toChain: U256::from(1024u64),
			toToken: address!("0202020202020202020202020202020202020202"),
			toAmount: U256::from(3456u64),
			collateralReceiver: address!("deadbeefdeadbeefdeadbeefdeadbeefdeadbeef"),
			collateralChain: U256::from(69u64),
			collateralAmount: U256::from(1234u64),
			collateralRewardable: U256::from(322u64),
			collateralUnlocked: U256::from(6996u64),
			deadline: U256::from(12_345_678_901_234_567_890u64),
			timeToSend: U256::from(112_233u64),
			timeToLiqSend: U256::from(330_101_033u64),
			nonce: U256::from(421_337u64),
		}
	}

	#[test]
	fn test_type_signature_lists_fields_in_declared_order() {
		assert_eq!(
			Order::eip712_encode_type(),
			"Order(address fromActor,address fromActorReceiver,uint256 fromChain,\
			address fromToken,uint256 fromAmount,address toActor,uint256 toChain,\
			address toToken,uint256 toAmount,address collateralReceiver,\
			uint256 collateralChain,uint256 collateralAmount,uint256 collateralRewardable,\
			uint256 collateralUnlocked,uint256 deadline,uint256 timeToSend,\
			uint256 timeToLiqSend,uint256 nonce)"
		);
	}

	#[test]
	fn test_domain_separator() {
		assert_eq!(
			domain_separator(),
			b256!("c2ebf8d262eff7f48a5e68cb9da02fefd7a23d970026e3efafc7b571605f561c")
		);
	}

	#[test]
	fn test_known_order_hash() {
		assert_eq!(
			hash_order(&vector_order()),
			b256!("044807f64a380eac8ee1fff9faca0f89c7015d9461afdd6fd567acc5016d4b7c")
		);
	}

	#[test]
	fn test_matches_signing_hash() {
		let order = vector_order();
		assert_eq!(hash_order(&order), order.eip712_signing_hash(&FLASH_DOMAIN));
	}

	#[test]
	fn test_single_field_change_changes_hash() {
		let base = vector_order();
		let base_hash = hash_order(&base);
		let other = address!("0000000000000000000000000000000000000001");
		let one = U256::from(1u64);

		let variants = [
			Order { fromActor: other, ..base.clone() },
			Order { fromActorReceiver: other, ..base.clone() },
			Order { fromChain: base.fromChain + one, ..base.clone() },
			Order { fromToken: other, ..base.clone() },
			Order { fromAmount: base.fromAmount + one, ..base.clone() },
			Order { toActor: other, ..base.clone() },
			Order { toChain: base.toChain + one, ..base.clone() },
			Order { toToken: other, ..base.clone() },
			Order { toAmount: base.toAmount + one, ..base.clone() },
			Order { collateralReceiver: other, ..base.clone() },
			Order { collateralChain: base.collateralChain + one, ..base.clone() },
			Order { collateralAmount: base.collateralAmount + one, ..base.clone() },
			Order { collateralRewardable: base.collateralRewardable + one, ..base.clone() },
			Order { collateralUnlocked: base.collateralUnlocked + one, ..base.clone() },
			Order { deadline: base.deadline + one, ..base.clone() },
			Order { timeToSend: base.timeToSend + one, ..base.clone() },
			Order { timeToLiqSend: base.timeToLiqSend + one, ..base.clone() },
			Order { nonce: base.nonce + one, ..base.clone() },
		];

		let mut seen = std::collections::HashSet::new();
		seen.insert(base_hash);
		for variant in &variants {
			assert!(seen.insert(hash_order(variant)), "collision for {:?}", variant);
		}
		assert_eq!(seen.len(), variants.len() + 1);
	}

	#[test]
	fn test_zero_order_hash_is_stable() {
		let zero = Order {
			fromActor: Address::ZERO,
			..Default::default()
		};
		assert_eq!(hash_order(&zero), hash_order(&Order::default()));
		assert_ne!(hash_order(&zero), B256::ZERO);
	}
}
