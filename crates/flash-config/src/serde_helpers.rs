//! Serde helpers for configuration deserialization

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer};

/// TOML integers stop at 63 bits, so large amounts are written as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Amount {
	Integer(i64),
	Text(String),
}

impl Amount {
	fn into_u256<E: serde::de::Error>(self) -> Result<U256, E> {
		match self {
			Amount::Integer(value) => u64::try_from(value)
				.map(U256::from)
				.map_err(|_| E::custom(format!("Negative amount: {}", value))),
			Amount::Text(text) => text
				.parse::<U256>()
				.map_err(|e| E::custom(format!("Invalid uint256 '{}': {}", text, e))),
		}
	}
}

/// Deserializes a U256 from an integer, a decimal string or a `0x` hex string.
pub fn deserialize_u256<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
	D: Deserializer<'de>,
{
	Amount::deserialize(deserializer)?.into_u256()
}

/// Optional variant of [`deserialize_u256`].
pub fn deserialize_opt_u256<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
where
	D: Deserializer<'de>,
{
	Option::<Amount>::deserialize(deserializer)?
		.map(Amount::into_u256)
		.transpose()
}
