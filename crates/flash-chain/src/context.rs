//! Call frames.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::{Address, Bytes, Log, B256, U256};
use alloy_sol_types::{SolCall, SolEvent};
use flash_types::Revert;
use tracing::trace;

use crate::{state::WorldState, storage::StorageWord, Contract};

/// Deepest allowed nesting of call frames.
pub const MAX_CALL_DEPTH: usize = 256;

pub(crate) type CodeRegistry = HashMap<Address, Arc<dyn Contract>>;

/// Identity a frame executes under.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
	/// Where the executed code is deployed.
	pub code_address: Address,
	/// Whose storage and balance the code acts on.
	pub address: Address,
	pub caller: Address,
	pub value: U256,
	/// Whether `value` moves from `caller` to `address` on entry.
	pub transfers_value: bool,
	pub depth: usize,
}

/// Execution context handed to a running contract.
pub struct CallContext<'a> {
	state: &'a mut WorldState,
	code: &'a CodeRegistry,
	address: Address,
	caller: Address,
	value: U256,
	depth: usize,
}

impl<'a> CallContext<'a> {
	/// Address whose storage and balance this frame acts on.
	pub fn address(&self) -> Address {
		self.address
	}

	pub fn caller(&self) -> Address {
		self.caller
	}

	/// Native value attached to the call.
	pub fn value(&self) -> U256 {
		self.value
	}

	pub fn depth(&self) -> usize {
		self.depth
	}

	pub fn sload(&self, slot: B256) -> B256 {
		self.state.sload(self.address, slot)
	}

	pub fn sstore(&mut self, slot: B256, value: B256) {
		self.state.sstore(self.address, slot, value)
	}

	pub fn load<T: StorageWord>(&self, slot: B256) -> T {
		T::from_word(self.sload(slot))
	}

	pub fn store<T: StorageWord>(&mut self, slot: B256, value: T) {
		self.sstore(slot, value.to_word())
	}

	/// Native balance of `account`.
	pub fn balance(&self, account: Address) -> U256 {
		self.state.balance(account)
	}

	pub fn has_code(&self, account: Address) -> bool {
		self.code.contains_key(&account)
	}

	/// Emits `event` from the current address.
	pub fn emit<E: SolEvent>(&mut self, event: &E) {
		self.state.push_log(Log {
			address: self.address,
			data: event.encode_log_data(),
		});
	}

	/// Calls `target` under its own identity, moving `value` to it first.
	pub fn call(&mut self, target: Address, value: U256, input: &[u8]) -> Result<Bytes, Revert> {
		let frame = Frame {
			code_address: target,
			address: target,
			caller: self.address,
			value,
			transfers_value: true,
			depth: self.depth + 1,
		};
		execute_frame(self.state, self.code, frame, input)
	}

	/// Encodes `call` and sends it to `target` without value.
	pub fn call_sol<C: SolCall>(&mut self, target: Address, call: &C) -> Result<Bytes, Revert> {
		self.call(target, U256::ZERO, &call.abi_encode())
	}

	/// Runs the code at `target` against this frame's storage, balance,
	/// caller and value.
	pub fn delegate_call(&mut self, target: Address, input: &[u8]) -> Result<Bytes, Revert> {
		let frame = Frame {
			code_address: target,
			address: self.address,
			caller: self.caller,
			value: self.value,
			transfers_value: false,
			depth: self.depth + 1,
		};
		execute_frame(self.state, self.code, frame, input)
	}
}

/// Runs one frame, rolling back its effects if it fails.
pub(crate) fn execute_frame(
	state: &mut WorldState,
	code: &CodeRegistry,
	frame: Frame,
	input: &[u8],
) -> Result<Bytes, Revert> {
	if frame.depth > MAX_CALL_DEPTH {
		return Err(Revert::empty());
	}

	let checkpoint = state.checkpoint();
	let result = run_frame(state, code, frame, input);
	if result.is_err() {
		state.revert_to(checkpoint);
	}
	result
}

fn run_frame(
	state: &mut WorldState,
	code: &CodeRegistry,
	frame: Frame,
	input: &[u8],
) -> Result<Bytes, Revert> {
	if frame.transfers_value && !frame.value.is_zero() {
		state
			.transfer(frame.caller, frame.address, frame.value)
			.map_err(|_| Revert::empty())?;
	}

	// Calls to accounts without code succeed with no output.
	let Some(contract) = code.get(&frame.code_address) else {
		return Ok(Bytes::new());
	};

	trace!(
		contract = contract.name(),
		address = %frame.address,
		caller = %frame.caller,
		depth = frame.depth,
		"Entering call frame"
	);

	let mut ctx = CallContext {
		state,
		code,
		address: frame.address,
		caller: frame.caller,
		value: frame.value,
		depth: frame.depth,
	};
	contract.call(&mut ctx, input)
}
