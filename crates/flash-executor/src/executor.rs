//! The call executor contract.

use alloy_primitives::{Bytes, U256};
use alloy_sol_types::SolCall;
use flash_chain::{CallContext, Contract};
use flash_types::{Call, ICallExecutor, Revert};
use tracing::{debug, warn};

/// Runs batches of calls on behalf of whoever submits them.
///
/// Value sent with `executeCalls` is credited to the executor before the
/// batch starts and can be forwarded by the calls in it. Empty calldata is
/// accepted as a plain value transfer.
#[derive(Debug, Default, Clone, Copy)]
pub struct CallExecutor;

impl CallExecutor {
	pub fn new() -> Self {
		Self
	}
}

impl Contract for CallExecutor {
	fn name(&self) -> &str {
		"CallExecutor"
	}

	fn call(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Bytes, Revert> {
		if input.is_empty() {
			return Ok(Bytes::new());
		}

		let call =
			ICallExecutor::executeCallsCall::abi_decode(input).map_err(|_| Revert::empty())?;
		execute_calls(ctx, &call.calls)?;
		Ok(Bytes::new())
	}
}

/// Executes `calls` strictly in order from the current frame.
///
/// A failing call that does not allow failure aborts the batch with its
/// revert data untouched; the enclosing frame then rolls back every earlier
/// call. A tolerated failure only rolls back that call.
pub fn execute_calls(ctx: &mut CallContext<'_>, calls: &[Call]) -> Result<(), Revert> {
	debug!(executor = %ctx.address(), calls = calls.len(), "Executing call batch");

	for (index, call) in calls.iter().enumerate() {
		let result = if call.isDelegateCall {
			if call.value.is_zero() {
				ctx.delegate_call(call.target, &call.callData)
			} else {
				Err(Revert::from_error(ICallExecutor::DelegateCallWithValue {
					index: U256::from(index),
				}))
			}
		} else {
			ctx.call(call.target, call.value, &call.callData)
		};

		match result {
			Ok(_) => {
				debug!(
					index,
					target = %call.target,
					delegate = call.isDelegateCall,
					"Call succeeded"
				);
			}
			Err(revert) if call.allowFailure => {
				warn!(index, target = %call.target, error = %revert, "Tolerated call failure");
			}
			Err(revert) => {
				debug!(index, target = %call.target, error = %revert, "Call failed, aborting batch");
				return Err(revert);
			}
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Batch;
	use alloy_primitives::Address;
	use alloy_sol_types::{sol, SolInterface, SolValue};
	use flash_chain::{slot, Chain, ChainError, StorageWord};

	sol! {
		interface IRecorder {
			function record(uint256 value) external;
			function count() external view returns (uint256);
			function last() external view returns (uint256);
			function fail(uint256 code) external;

			error RecorderFailed(uint256 code);
		}
	}

	/// Appends values at slot 0 (count) and slot 1 (last value).
	struct Recorder;

	impl Contract for Recorder {
		fn name(&self) -> &str {
			"Recorder"
		}

		fn call(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Bytes, Revert> {
			use IRecorder::IRecorderCalls;

			match IRecorderCalls::abi_decode(input).map_err(|_| Revert::empty())? {
				IRecorderCalls::record(c) => {
					let count: U256 = ctx.load(slot(0));
					let last: U256 = ctx.load(slot(1));
					// Encode ordering: last = last * 10 + value.
					ctx.store(slot(0), count + U256::from(1u64));
					ctx.store(slot(1), last * U256::from(10u64) + c.value);
					Ok(Bytes::new())
				}
				IRecorderCalls::count(_) => Ok(ctx.load::<U256>(slot(0)).abi_encode().into()),
				IRecorderCalls::last(_) => Ok(ctx.load::<U256>(slot(1)).abi_encode().into()),
				IRecorderCalls::fail(c) => {
					ctx.store(slot(0), U256::from(999u64));
					Err(Revert::from_error(IRecorder::RecorderFailed { code: c.code }))
				}
			}
		}
	}

	const SUBMITTER: Address = Address::repeat_byte(0x5b);

	fn setup() -> (Chain, Address, Address) {
		let mut chain = Chain::new();
		let executor = chain.deploy(CallExecutor::new());
		let recorder = chain.deploy(Recorder);
		(chain, executor, recorder)
	}

	fn read(chain: &mut Chain, target: Address, call: impl SolCall) -> U256 {
		let output = chain.view(SUBMITTER, target, &call.abi_encode()).unwrap();
		U256::abi_decode(&output).unwrap()
	}

	fn record(value: u64) -> IRecorder::recordCall {
		IRecorder::recordCall {
			value: U256::from(value),
		}
	}

	fn fail(code: u64) -> IRecorder::failCall {
		IRecorder::failCall {
			code: U256::from(code),
		}
	}

	#[test]
	fn test_calls_run_in_order() {
		let (mut chain, executor, recorder) = setup();

		let batch = Batch::new()
			.call(recorder, &record(1))
			.call(recorder, &record(2))
			.call(recorder, &record(3));
		chain
			.transact(SUBMITTER, executor, U256::ZERO, &batch.encode())
			.unwrap();

		assert_eq!(read(&mut chain, recorder, IRecorder::countCall {}), U256::from(3u64));
		assert_eq!(read(&mut chain, recorder, IRecorder::lastCall {}), U256::from(123u64));
	}

	#[test]
	fn test_tolerated_failure_is_skipped() {
		let (mut chain, executor, recorder) = setup();

		let batch = Batch::new()
			.call(recorder, &record(1))
			.call(recorder, &fail(7))
			.tolerant()
			.call(recorder, &record(2));
		chain
			.transact(SUBMITTER, executor, U256::ZERO, &batch.encode())
			.unwrap();

		// The failed call's own write to slot 0 was rolled back.
		assert_eq!(read(&mut chain, recorder, IRecorder::countCall {}), U256::from(2u64));
		assert_eq!(read(&mut chain, recorder, IRecorder::lastCall {}), U256::from(12u64));
	}

	#[test]
	fn test_failure_aborts_batch_and_rolls_back_earlier_calls() {
		let (mut chain, executor, recorder) = setup();

		let batch = Batch::new()
			.call(recorder, &record(1))
			.call(recorder, &record(2))
			.call(recorder, &fail(42))
			.call(recorder, &record(3));
		let error = chain
			.transact(SUBMITTER, executor, U256::ZERO, &batch.encode())
			.unwrap_err();

		assert_eq!(
			error.revert(),
			Some(&Revert::from_error(IRecorder::RecorderFailed {
				code: U256::from(42u64)
			}))
		);
		assert_eq!(read(&mut chain, recorder, IRecorder::countCall {}), U256::ZERO);
		assert_eq!(read(&mut chain, recorder, IRecorder::lastCall {}), U256::ZERO);
	}

	#[test]
	fn test_delegate_call_uses_executor_storage() {
		let (mut chain, executor, recorder) = setup();

		let batch = Batch::new().delegate_call(recorder, record(5).abi_encode().into());
		chain
			.transact(SUBMITTER, executor, U256::ZERO, &batch.encode())
			.unwrap();

		assert_eq!(chain.storage_at(executor, slot(0)), U256::from(1u64).to_word());
		assert_eq!(chain.storage_at(executor, slot(1)), U256::from(5u64).to_word());
		assert_eq!(read(&mut chain, recorder, IRecorder::countCall {}), U256::ZERO);
	}

	#[test]
	fn test_delegate_call_with_value_is_rejected() {
		let (mut chain, executor, recorder) = setup();
		chain.fund(SUBMITTER, U256::from(10u64));

		let mut batch = Batch::new();
		batch.push(Call {
			target: recorder,
			value: U256::from(1u64),
			callData: record(5).abi_encode().into(),
			allowFailure: false,
			isDelegateCall: true,
		});
		let error = chain
			.transact(SUBMITTER, executor, U256::from(1u64), &batch.encode())
			.unwrap_err();

		let decoded = error
			.revert()
			.and_then(|r| r.decode::<ICallExecutor::DelegateCallWithValue>())
			.unwrap();
		assert_eq!(decoded.index, U256::ZERO);
		assert_eq!(chain.balance(SUBMITTER), U256::from(10u64));
	}

	#[test]
	fn test_tolerated_delegate_call_with_value_is_skipped() {
		let (mut chain, executor, recorder) = setup();

		let mut batch = Batch::new().call(recorder, &record(4));
		batch.push(Call {
			target: recorder,
			value: U256::from(1u64),
			callData: record(5).abi_encode().into(),
			allowFailure: true,
			isDelegateCall: true,
		});
		chain
			.transact(SUBMITTER, executor, U256::ZERO, &batch.encode())
			.unwrap();

		assert_eq!(read(&mut chain, recorder, IRecorder::lastCall {}), U256::from(4u64));
		assert_eq!(chain.storage_at(executor, slot(0)), alloy_primitives::B256::default());
	}

	#[test]
	fn test_payable_batch_forwards_value() {
		let (mut chain, executor, _) = setup();
		let payee = Address::repeat_byte(0x77);
		chain.fund(SUBMITTER, U256::from(100u64));

		let batch = Batch::new().call_with_value(payee, U256::from(30u64), Bytes::new());
		chain
			.transact(SUBMITTER, executor, U256::from(50u64), &batch.encode())
			.unwrap();

		assert_eq!(chain.balance(SUBMITTER), U256::from(50u64));
		assert_eq!(chain.balance(executor), U256::from(20u64));
		assert_eq!(chain.balance(payee), U256::from(30u64));
	}

	#[test]
	fn test_overspending_value_fails_the_call() {
		let (mut chain, executor, _) = setup();
		let payee = Address::repeat_byte(0x77);

		let batch = Batch::new().call_with_value(payee, U256::from(1u64), Bytes::new());
		let error = chain
			.transact(SUBMITTER, executor, U256::ZERO, &batch.encode())
			.unwrap_err();
		assert!(matches!(error, ChainError::Reverted(ref r) if r.is_empty()));
	}

	#[test]
	fn test_empty_batch_succeeds() {
		let (mut chain, executor, _) = setup();
		let receipt = chain
			.transact(SUBMITTER, executor, U256::ZERO, &Batch::new().encode())
			.unwrap();
		assert!(receipt.logs.is_empty());
	}

	#[test]
	fn test_garbage_calldata_reverts() {
		let (mut chain, executor, _) = setup();
		let error = chain
			.transact(SUBMITTER, executor, U256::ZERO, &[0xde, 0xad])
			.unwrap_err();
		assert!(error.revert().unwrap().is_empty());
	}
}
