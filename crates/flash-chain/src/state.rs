//! Journaled world state.
//!
//! Every mutation records the value it overwrote. A [`Checkpoint`] is just
//! the journal and log lengths at some point, so reverting pops entries back
//! to that length and restores what they recorded.

use std::collections::HashMap;

use alloy_primitives::{Address, Log, B256, U256};

use crate::ChainError;

#[derive(Debug, Clone)]
enum JournalEntry {
	StorageChanged {
		address: Address,
		slot: B256,
		previous: B256,
	},
	BalanceChanged {
		address: Address,
		previous: U256,
	},
}

/// Position in the journal that state can be rolled back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
	journal_len: usize,
	logs_len: usize,
}

/// Storage words, native balances and emitted logs of every account.
#[derive(Debug, Default)]
pub struct WorldState {
	storage: HashMap<Address, HashMap<B256, B256>>,
	balances: HashMap<Address, U256>,
	logs: Vec<Log>,
	journal: Vec<JournalEntry>,
}

impl WorldState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn checkpoint(&self) -> Checkpoint {
		Checkpoint {
			journal_len: self.journal.len(),
			logs_len: self.logs.len(),
		}
	}

	/// Undoes every change made after `checkpoint`.
	pub fn revert_to(&mut self, checkpoint: Checkpoint) {
		while self.journal.len() > checkpoint.journal_len {
			match self.journal.pop() {
				Some(JournalEntry::StorageChanged {
					address,
					slot,
					previous,
				}) => self.write_slot(address, slot, previous),
				Some(JournalEntry::BalanceChanged { address, previous }) => {
					self.write_balance(address, previous)
				}
				None => break,
			}
		}
		self.logs.truncate(checkpoint.logs_len);
	}

	/// Makes every journaled change permanent.
	pub fn commit(&mut self) {
		self.journal.clear();
	}

	pub fn sload(&self, address: Address, slot: B256) -> B256 {
		self.storage
			.get(&address)
			.and_then(|slots| slots.get(&slot))
			.copied()
			.unwrap_or_default()
	}

	pub fn sstore(&mut self, address: Address, slot: B256, value: B256) {
		let previous = self.sload(address, slot);
		if previous == value {
			return;
		}
		self.journal.push(JournalEntry::StorageChanged {
			address,
			slot,
			previous,
		});
		self.write_slot(address, slot, value);
	}

	pub fn balance(&self, address: Address) -> U256 {
		self.balances.get(&address).copied().unwrap_or_default()
	}

	pub fn set_balance(&mut self, address: Address, value: U256) {
		let previous = self.balance(address);
		if previous == value {
			return;
		}
		self.journal
			.push(JournalEntry::BalanceChanged { address, previous });
		self.write_balance(address, value);
	}

	/// Moves native value between accounts.
	pub fn transfer(&mut self, from: Address, to: Address, value: U256) -> Result<(), ChainError> {
		let balance = self.balance(from);
		if balance < value {
			return Err(ChainError::InsufficientFunds {
				account: from,
				balance,
				needed: value,
			});
		}
		self.set_balance(from, balance - value);
		// Credit after debit so a self transfer is a no-op.
		let credited = self.balance(to).saturating_add(value);
		self.set_balance(to, credited);
		Ok(())
	}

	pub fn push_log(&mut self, log: Log) {
		self.logs.push(log);
	}

	pub fn logs(&self) -> &[Log] {
		&self.logs
	}

	/// Removes and returns all logs emitted so far.
	pub fn take_logs(&mut self) -> Vec<Log> {
		std::mem::take(&mut self.logs)
	}

	fn write_slot(&mut self, address: Address, slot: B256, value: B256) {
		if value.is_zero() {
			if let Some(slots) = self.storage.get_mut(&address) {
				slots.remove(&slot);
			}
		} else {
			self.storage.entry(address).or_default().insert(slot, value);
		}
	}

	fn write_balance(&mut self, address: Address, value: U256) {
		if value.is_zero() {
			self.balances.remove(&address);
		} else {
			self.balances.insert(address, value);
		}
	}
}
