//! Steps shared by both adapters.

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolValue;
use flash_chain::CallContext;
use flash_types::{IFlashErrors, IOrderReceiver, OrderHash, Revert, IERC20};

fn is_settled(
	ctx: &mut CallContext<'_>,
	receiver: Address,
	order_hash: OrderHash,
) -> Result<bool, Revert> {
	let output = ctx.call_sol(
		receiver,
		&IOrderReceiver::settledCall {
			orderHash: order_hash,
		},
	)?;
	bool::abi_decode(&output).map_err(|_| Revert::empty())
}

/// Fails with `AlreadySettled` if the receiver already holds the flag.
pub(crate) fn ensure_not_settled(
	ctx: &mut CallContext<'_>,
	receiver: Address,
	order_hash: OrderHash,
) -> Result<(), Revert> {
	if is_settled(ctx, receiver, order_hash)? {
		return Err(Revert::from_error(IFlashErrors::AlreadySettled {
			orderHash: order_hash,
		}));
	}
	Ok(())
}

/// Fails with `NotSettled` if the resolver never acknowledged the order.
pub(crate) fn ensure_settled(
	ctx: &mut CallContext<'_>,
	receiver: Address,
	order_hash: OrderHash,
) -> Result<(), Revert> {
	if !is_settled(ctx, receiver, order_hash)? {
		return Err(Revert::from_error(IFlashErrors::NotSettled {
			orderHash: order_hash,
		}));
	}
	Ok(())
}

/// `transferFrom` that accepts tokens returning nothing, rejects tokens
/// returning false, and passes token reverts through untouched.
pub(crate) fn safe_transfer_from(
	ctx: &mut CallContext<'_>,
	token: Address,
	from: Address,
	to: Address,
	amount: U256,
) -> Result<(), Revert> {
	let output = ctx.call_sol(
		token,
		&IERC20::transferFromCall {
			from,
			to,
			value: amount,
		},
	)?;

	let succeeded = if output.is_empty() {
		ctx.has_code(token)
	} else {
		bool::abi_decode(&output).unwrap_or(false)
	};
	if !succeeded {
		return Err(Revert::from_error(IFlashErrors::SafeERC20FailedOperation { token }));
	}
	Ok(())
}

pub(crate) fn balance_of(
	ctx: &mut CallContext<'_>,
	token: Address,
	account: Address,
) -> Result<U256, Revert> {
	let output = ctx.call_sol(token, &IERC20::balanceOfCall { account })?;
	U256::abi_decode(&output).map_err(|_| Revert::empty())
}

/// Fails with `InsufficientBalanceAfter` if `account` holds less than
/// `required` of `token`.
pub(crate) fn ensure_balance_after(
	ctx: &mut CallContext<'_>,
	token: Address,
	account: Address,
	required: U256,
) -> Result<(), Revert> {
	let actual = balance_of(ctx, token, account)?;
	if actual < required {
		return Err(Revert::from_error(IFlashErrors::InsufficientBalanceAfter {
			actual,
			required,
		}));
	}
	Ok(())
}

/// Calls the resolver, passing its revert data through untouched.
pub(crate) fn invoke_resolver(
	ctx: &mut CallContext<'_>,
	resolver: Address,
	payload: &[u8],
) -> Result<(), Revert> {
	ctx.call(resolver, U256::ZERO, payload)?;
	Ok(())
}
