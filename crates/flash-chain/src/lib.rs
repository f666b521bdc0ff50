//! Minimal contract runtime for the Flash settlement contracts.
//!
//! Contracts are plain Rust values implementing [`Contract`]. They keep
//! immutable configuration in their own fields and all mutable state in the
//! journaled [`WorldState`], reached through a [`CallContext`]. Every call
//! frame checkpoints the journal and rolls back to it on failure, so a
//! transaction either commits every effect or none.

pub mod chain;
pub mod context;
pub mod state;
pub mod storage;

pub use chain::{Chain, Receipt};
pub use context::{CallContext, MAX_CALL_DEPTH};
pub use state::{Checkpoint, WorldState};
pub use storage::{mapping_slot, slot, StorageWord};

use alloy_primitives::{Address, Bytes, U256};
use flash_types::Revert;
use thiserror::Error;

/// Errors that can occur while driving the chain from outside.
#[derive(Debug, Error)]
pub enum ChainError {
	/// The transaction ran and reverted; every effect was discarded.
	#[error(transparent)]
	Reverted(#[from] Revert),
	#[error("Insufficient native balance: {account} has {balance}, needs {needed}")]
	InsufficientFunds {
		account: Address,
		balance: U256,
		needed: U256,
	},
	#[error("Address {0} already has code")]
	AddressInUse(Address),
}

impl ChainError {
	/// Revert payload of a reverted transaction.
	pub fn revert(&self) -> Option<&Revert> {
		match self {
			ChainError::Reverted(revert) => Some(revert),
			_ => None,
		}
	}
}

/// Code deployed at an address.
///
/// `call` receives the raw calldata and returns raw return data, or the raw
/// revert payload on failure. Implementations must route every state change
/// through `ctx`; effects kept anywhere else would survive a revert.
pub trait Contract: Send + Sync {
	/// Human readable name used in logs.
	fn name(&self) -> &str;

	fn call(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Bytes, Revert>;
}
