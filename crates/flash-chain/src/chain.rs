//! The chain: code registry plus world state, driven one transaction at a
//! time.

use std::sync::Arc;

use alloy_primitives::{keccak256, Address, Bytes, Log, B256, U256};
use alloy_sol_types::SolEvent;
use tracing::{debug, warn};

use crate::{
	context::{execute_frame, CodeRegistry, Frame},
	state::WorldState,
	ChainError, Contract,
};

/// Outcome of a committed transaction.
#[derive(Debug, Clone, Default)]
pub struct Receipt {
	pub output: Bytes,
	pub logs: Vec<Log>,
}

impl Receipt {
	/// Decodes every log of event type `E`, paired with its emitter.
	pub fn events<E: SolEvent>(&self) -> Vec<(Address, E)> {
		self.logs
			.iter()
			.filter(|log| log.data.topics().first() == Some(&E::SIGNATURE_HASH))
			.filter_map(|log| {
				E::decode_log_data(&log.data)
					.ok()
					.map(|event| (log.address, event))
			})
			.collect()
	}
}

/// An in-memory chain.
#[derive(Default)]
pub struct Chain {
	state: WorldState,
	code: CodeRegistry,
	deployments: u64,
}

impl Chain {
	pub fn new() -> Self {
		Self::default()
	}

	/// Deploys `contract` at a fresh address.
	pub fn deploy<C: Contract + 'static>(&mut self, contract: C) -> Address {
		loop {
			self.deployments += 1;
			let mut seed = [0u8; 40];
			seed[..32].copy_from_slice(keccak256(b"flash-chain/deploy").as_slice());
			seed[32..].copy_from_slice(&self.deployments.to_be_bytes());
			let address = Address::from_word(keccak256(seed));
			if !self.code.contains_key(&address) {
				debug!(name = contract.name(), %address, "Deployed contract");
				self.code.insert(address, Arc::new(contract));
				return address;
			}
		}
	}

	/// Deploys `contract` at a chosen address.
	pub fn deploy_at<C: Contract + 'static>(
		&mut self,
		address: Address,
		contract: C,
	) -> Result<(), ChainError> {
		if self.code.contains_key(&address) {
			return Err(ChainError::AddressInUse(address));
		}
		debug!(name = contract.name(), %address, "Deployed contract");
		self.code.insert(address, Arc::new(contract));
		Ok(())
	}

	pub fn has_code(&self, address: Address) -> bool {
		self.code.contains_key(&address)
	}

	/// Credits native balance out of thin air.
	pub fn fund(&mut self, account: Address, amount: U256) {
		let balance = self.state.balance(account).saturating_add(amount);
		self.state.set_balance(account, balance);
		self.state.commit();
	}

	pub fn balance(&self, account: Address) -> U256 {
		self.state.balance(account)
	}

	pub fn storage_at(&self, address: Address, slot: B256) -> B256 {
		self.state.sload(address, slot)
	}

	/// Executes a transaction from `from` to `to`.
	///
	/// On success every effect is committed and the logs are returned in
	/// the receipt. On revert nothing the transaction did remains visible.
	pub fn transact(
		&mut self,
		from: Address,
		to: Address,
		value: U256,
		input: &[u8],
	) -> Result<Receipt, ChainError> {
		let balance = self.state.balance(from);
		if balance < value {
			return Err(ChainError::InsufficientFunds {
				account: from,
				balance,
				needed: value,
			});
		}

		let checkpoint = self.state.checkpoint();
		let frame = Frame {
			code_address: to,
			address: to,
			caller: from,
			value,
			transfers_value: true,
			depth: 0,
		};

		match execute_frame(&mut self.state, &self.code, frame, input) {
			Ok(output) => {
				self.state.commit();
				let logs = self.state.take_logs();
				debug!(%from, %to, logs = logs.len(), "Transaction committed");
				Ok(Receipt { output, logs })
			}
			Err(revert) => {
				// The frame already unwound itself; drop anything left above it.
				self.state.revert_to(checkpoint);
				self.state.commit();
				warn!(%from, %to, error = %revert, "Transaction reverted");
				Err(ChainError::Reverted(revert))
			}
		}
	}

	/// Executes a read-only call and discards all of its effects.
	pub fn view(&mut self, from: Address, to: Address, input: &[u8]) -> Result<Bytes, ChainError> {
		let checkpoint = self.state.checkpoint();
		let frame = Frame {
			code_address: to,
			address: to,
			caller: from,
			value: U256::ZERO,
			transfers_value: false,
			depth: 0,
		};
		let result = execute_frame(&mut self.state, &self.code, frame, input);
		self.state.revert_to(checkpoint);
		self.state.commit();
		result.map_err(ChainError::Reverted)
	}
}
