//! Offline helpers behind the inspection subcommands.

use alloy_primitives::{Address, B256};
use anyhow::{Context, Result};
use flash_order::{hash_order, DynamicResolver};
use flash_types::{Order, OrderHash};

/// Parses an order from its JSON form, using the on-chain field names.
pub fn parse_order(json: &str) -> Result<Order> {
	serde_json::from_str(json).context("Failed to parse order JSON")
}

/// Decodes hex with or without a `0x` prefix.
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
	let trimmed = input.trim();
	let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
	hex::decode(digits).with_context(|| format!("Invalid hex input '{}'", trimmed))
}

pub fn order_hash_from_json(json: &str) -> Result<OrderHash> {
	Ok(hash_order(&parse_order(json)?))
}

pub fn encode_resolver(resolver: Address, offset: u128) -> Result<B256> {
	let descriptor =
		DynamicResolver::encode(resolver, offset).context("Failed to encode resolver")?;
	Ok(descriptor.word())
}

pub fn decode_resolver(word: B256) -> (Address, u128) {
	let descriptor = DynamicResolver::from_word(word);
	(descriptor.resolver(), descriptor.offset())
}

/// Reads the order a descriptor points at inside `payload`.
pub fn extract_order(descriptor: B256, payload: &[u8]) -> Result<(Order, OrderHash)> {
	let order = DynamicResolver::from_word(descriptor)
		.extract_order(payload)
		.context("Failed to extract order")?;
	let order_hash = hash_order(&order);
	Ok((order, order_hash))
}
