//! Raw revert payloads.
//!
//! A failing call frame hands its ABI encoded error data back to the parent
//! frame untouched. Keeping the bytes opaque is what lets a resolver or token
//! failure surface at the top of a batch with its original kind and
//! arguments; decoding happens only when something needs to inspect it.

use alloy_primitives::{hex, Bytes};
use alloy_sol_types::{SolError, SolInterface};
use thiserror::Error;

use crate::{
	ICallExecutor::ICallExecutorErrors, IERC20::IERC20Errors, IFlashErrors::IFlashErrorsErrors,
	IResolverMock::IResolverMockErrors,
};

/// ABI encoded revert data of a failed call frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("execution reverted: {}", describe(.0))]
pub struct Revert(pub Bytes);

impl Revert {
	/// Revert without any data, as produced by a bare `revert()`.
	pub fn empty() -> Self {
		Self(Bytes::new())
	}

	/// Encodes a custom error into revert data.
	pub fn from_error<E: SolError>(error: E) -> Self {
		Self(error.abi_encode().into())
	}

	/// Raw revert bytes.
	pub fn data(&self) -> &Bytes {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if the payload carries the selector of `E`.
	pub fn matches<E: SolError>(&self) -> bool {
		self.0.len() >= 4 && self.0[..4] == E::SELECTOR
	}

	/// Decodes the payload as custom error `E`.
	pub fn decode<E: SolError>(&self) -> Option<E> {
		if !self.matches::<E>() {
			return None;
		}
		E::abi_decode(&self.0).ok()
	}
}

impl From<Bytes> for Revert {
	fn from(data: Bytes) -> Self {
		Self(data)
	}
}

/// Renders revert data for humans, naming the error when it is one we know.
pub fn describe(data: &Bytes) -> String {
	if data.is_empty() {
		return "<empty revert data>".to_string();
	}

	if let Ok(error) = IFlashErrorsErrors::abi_decode(data) {
		return match error {
			IFlashErrorsErrors::AlreadySettled(e) => format!("AlreadySettled({})", e.orderHash),
			IFlashErrorsErrors::InsufficientBalanceAfter(e) => {
				format!("InsufficientBalanceAfter({}, {})", e.actual, e.required)
			}
			IFlashErrorsErrors::NotSettled(e) => format!("NotSettled({})", e.orderHash),
			IFlashErrorsErrors::AlreadyReceived(e) => {
				format!("AlreadyReceived({})", e.baseOrderHash)
			}
			IFlashErrorsErrors::TruncatedPayload(e) => format!(
				"TruncatedPayload({}, {}, {})",
				e.offset, e.required, e.actual
			),
			IFlashErrorsErrors::RateOverflow(_) => "RateOverflow()".to_string(),
			IFlashErrorsErrors::SafeERC20FailedOperation(e) => {
				format!("SafeERC20FailedOperation({})", e.token)
			}
		};
	}

	if let Ok(error) = IERC20Errors::abi_decode(data) {
		return match error {
			IERC20Errors::ERC20InsufficientBalance(e) => format!(
				"ERC20InsufficientBalance({}, {}, {})",
				e.sender, e.balance, e.needed
			),
			IERC20Errors::ERC20InsufficientAllowance(e) => format!(
				"ERC20InsufficientAllowance({}, {}, {})",
				e.spender, e.allowance, e.needed
			),
			IERC20Errors::ERC20InvalidReceiver(e) => {
				format!("ERC20InvalidReceiver({})", e.receiver)
			}
		};
	}

	if let Ok(ICallExecutorErrors::DelegateCallWithValue(e)) = ICallExecutorErrors::abi_decode(data)
	{
		return format!("DelegateCallWithValue({})", e.index);
	}

	if let Ok(IResolverMockErrors::ResolverTestError(_)) = IResolverMockErrors::abi_decode(data) {
		return "ResolverTestError()".to_string();
	}

	format!("0x{}", hex::encode(data))
}
