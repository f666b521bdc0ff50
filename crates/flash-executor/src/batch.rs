//! Off-chain construction of executor batches.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use flash_types::{Call, ICallExecutor};

/// Ordered list of calls for one `executeCalls` transaction.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Batch {
	calls: Vec<Call>,
}

impl Batch {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a plain call encoding `call`.
	pub fn call<C: SolCall>(self, target: Address, call: &C) -> Self {
		self.call_with_value(target, U256::ZERO, call.abi_encode().into())
	}

	/// Appends a plain call with raw calldata and attached value.
	pub fn call_with_value(mut self, target: Address, value: U256, data: Bytes) -> Self {
		self.calls.push(Call {
			target,
			value,
			callData: data,
			allowFailure: false,
			isDelegateCall: false,
		});
		self
	}

	/// Appends a delegated call with raw calldata.
	pub fn delegate_call(mut self, target: Address, data: Bytes) -> Self {
		self.calls.push(Call {
			target,
			value: U256::ZERO,
			callData: data,
			allowFailure: false,
			isDelegateCall: true,
		});
		self
	}

	/// Lets the most recently added call fail without aborting the batch.
	pub fn tolerant(mut self) -> Self {
		if let Some(last) = self.calls.last_mut() {
			last.allowFailure = true;
		}
		self
	}

	pub fn push(&mut self, call: Call) -> &mut Self {
		self.calls.push(call);
		self
	}

	pub fn len(&self) -> usize {
		self.calls.len()
	}

	pub fn is_empty(&self) -> bool {
		self.calls.is_empty()
	}

	pub fn calls(&self) -> &[Call] {
		&self.calls
	}

	pub fn into_calls(self) -> Vec<Call> {
		self.calls
	}

	/// `executeCalls` calldata for this batch.
	pub fn encode(&self) -> Vec<u8> {
		ICallExecutor::executeCallsCall {
			calls: self.calls.clone(),
		}
		.abi_encode()
	}
}

impl From<Vec<Call>> for Batch {
	fn from(calls: Vec<Call>) -> Self {
		Self { calls }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_tolerant_marks_only_last_call() {
		let first = Address::repeat_byte(1);
		let second = Address::repeat_byte(2);

		let batch = Batch::new()
			.call_with_value(first, U256::from(3u64), Bytes::new())
			.delegate_call(second, Bytes::from_static(&[1, 2]))
			.tolerant();

		let calls = batch.calls();
		assert_eq!(batch.len(), 2);
		assert!(!calls[0].allowFailure);
		assert!(!calls[0].isDelegateCall);
		assert_eq!(calls[0].value, U256::from(3u64));
		assert!(calls[1].allowFailure);
		assert!(calls[1].isDelegateCall);
	}

	#[test]
	fn test_tolerant_on_empty_batch_is_noop() {
		assert!(Batch::new().tolerant().is_empty());
	}

	#[test]
	fn test_encode_round_trips_through_abi() {
		let batch = Batch::new()
			.call_with_value(Address::repeat_byte(9), U256::ZERO, Bytes::from_static(b"abc"))
			.tolerant();

		let decoded = ICallExecutor::executeCallsCall::abi_decode(&batch.encode()).unwrap();
		assert_eq!(Batch::from(decoded.calls), batch);
	}
}
