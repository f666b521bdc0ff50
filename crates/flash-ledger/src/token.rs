//! ERC-20 token ledger.
//!
//! Storage layout:
//! - slot 0: `mapping(address => uint256) balances`
//! - slot 1: `mapping(address => mapping(address => uint256)) allowances`
//! - slot 2: `uint256 totalSupply`
//!
//! `transferFrom` spends the allowance before moving the balance, so an
//! unauthorized spender sees the allowance error even when the owner is also
//! short of funds. An allowance of `uint256.max` is never decremented.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{SolInterface, SolValue};
use flash_chain::{mapping_slot, slot, CallContext, Contract};
use flash_types::{IERC20::{self, IERC20Calls}, Revert};

#[derive(Debug, Default, Clone)]
pub struct Erc20Token {
	name: String,
}

impl Erc20Token {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}

	fn balance_slot(account: Address) -> B256 {
		mapping_slot(account.into_word(), slot(0))
	}

	fn allowance_slot(owner: Address, spender: Address) -> B256 {
		mapping_slot(spender.into_word(), mapping_slot(owner.into_word(), slot(1)))
	}

	fn total_supply_slot() -> B256 {
		slot(2)
	}

	fn transfer(
		ctx: &mut CallContext<'_>,
		from: Address,
		to: Address,
		value: U256,
	) -> Result<(), Revert> {
		if to.is_zero() {
			return Err(Revert::from_error(IERC20::ERC20InvalidReceiver { receiver: to }));
		}

		let from_balance: U256 = ctx.load(Self::balance_slot(from));
		if from_balance < value {
			return Err(Revert::from_error(IERC20::ERC20InsufficientBalance {
				sender: from,
				balance: from_balance,
				needed: value,
			}));
		}
		ctx.store(Self::balance_slot(from), from_balance - value);

		let to_balance: U256 = ctx.load(Self::balance_slot(to));
		ctx.store(Self::balance_slot(to), to_balance + value);

		ctx.emit(&IERC20::Transfer { from, to, value });
		Ok(())
	}

	fn spend_allowance(
		ctx: &mut CallContext<'_>,
		owner: Address,
		spender: Address,
		value: U256,
	) -> Result<(), Revert> {
		let allowance: U256 = ctx.load(Self::allowance_slot(owner, spender));
		if allowance == U256::MAX {
			return Ok(());
		}
		if allowance < value {
			return Err(Revert::from_error(IERC20::ERC20InsufficientAllowance {
				spender,
				allowance,
				needed: value,
			}));
		}
		ctx.store(Self::allowance_slot(owner, spender), allowance - value);
		Ok(())
	}
}

impl Contract for Erc20Token {
	fn name(&self) -> &str {
		&self.name
	}

	fn call(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Bytes, Revert> {
		let call = IERC20Calls::abi_decode(input).map_err(|_| Revert::empty())?;
		let caller = ctx.caller();

		let output = match call {
			IERC20Calls::totalSupply(_) => {
				ctx.load::<U256>(Self::total_supply_slot()).abi_encode()
			}
			IERC20Calls::balanceOf(c) => ctx.load::<U256>(Self::balance_slot(c.account)).abi_encode(),
			IERC20Calls::allowance(c) => ctx
				.load::<U256>(Self::allowance_slot(c.owner, c.spender))
				.abi_encode(),
			IERC20Calls::approve(c) => {
				ctx.store(Self::allowance_slot(caller, c.spender), c.value);
				ctx.emit(&IERC20::Approval {
					owner: caller,
					spender: c.spender,
					value: c.value,
				});
				true.abi_encode()
			}
			IERC20Calls::transfer(c) => {
				Self::transfer(ctx, caller, c.to, c.value)?;
				true.abi_encode()
			}
			IERC20Calls::transferFrom(c) => {
				Self::spend_allowance(ctx, c.from, caller, c.value)?;
				Self::transfer(ctx, c.from, c.to, c.value)?;
				true.abi_encode()
			}
			IERC20Calls::mint(c) => {
				if c.account.is_zero() {
					return Err(Revert::from_error(IERC20::ERC20InvalidReceiver {
						receiver: c.account,
					}));
				}
				let supply: U256 = ctx.load(Self::total_supply_slot());
				let supply = supply
					.checked_add(c.value)
					.ok_or_else(Revert::empty)?;
				ctx.store(Self::total_supply_slot(), supply);

				let balance: U256 = ctx.load(Self::balance_slot(c.account));
				ctx.store(Self::balance_slot(c.account), balance + c.value);
				ctx.emit(&IERC20::Transfer {
					from: Address::ZERO,
					to: c.account,
					value: c.value,
				});
				Vec::new()
			}
		};

		Ok(output.into())
	}
}
