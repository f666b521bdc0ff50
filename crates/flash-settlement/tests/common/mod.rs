//! Deployment fixture shared by the settlement flow tests.

#![allow(dead_code)]

use alloy_primitives::{address, Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolValue};
use flash_chain::{Chain, ChainError, Receipt};
use flash_executor::{Batch, CallExecutor};
use flash_ledger::{Erc20Token, OrderReceiver, ResolverFlow, ResolverMock};
use flash_settlement::{DynamicSettlementAdapter, FixedSettlementAdapter, TopUpPolicy};
use flash_types::{IOrderReceiver, IResolverMock, Order, IERC20};

pub const SUBMITTER: Address = address!("5b5b5b5b5b5b5b5b5b5b5b5b5b5b5b5b5b5b5b5b");
pub const EXECUTOR_BALANCE: u64 = 123_456_789_012;
pub const FROM_AMOUNT: u64 = 444_222;

pub struct Fixture {
	pub chain: Chain,
	pub executor: Address,
	pub token: Address,
	pub receiver: Address,
	pub resolver: Address,
	pub fixed: Address,
	pub dynamic: Address,
}

impl Fixture {
	pub fn new() -> Self {
		Self::with_policy(TopUpPolicy::default())
	}

	pub fn with_policy(policy: TopUpPolicy) -> Self {
		let mut chain = Chain::new();
		let receiver = chain.deploy(OrderReceiver::new());
		let resolver = chain.deploy(ResolverMock::new(receiver));
		let fixed = chain.deploy(FixedSettlementAdapter::new(receiver));
		let dynamic = chain.deploy(DynamicSettlementAdapter::with_policy(receiver, policy));
		let executor = chain.deploy(CallExecutor::new());
		let token = chain.deploy(Erc20Token::new("TokenMock"));

		Self {
			chain,
			executor,
			token,
			receiver,
			resolver,
			fixed,
			dynamic,
		}
	}

	/// Fixture whose executor already holds `amount` tokens.
	pub fn funded(amount: u64) -> Self {
		let mut fixture = Self::new();
		fixture.mint(fixture.executor, amount);
		fixture
	}

	pub fn mint(&mut self, account: Address, amount: u64) {
		let call = IERC20::mintCall {
			account,
			value: U256::from(amount),
		};
		self.chain
			.transact(SUBMITTER, self.token, U256::ZERO, &call.abi_encode())
			.unwrap();
	}

	pub fn balance_of(&mut self, account: Address) -> U256 {
		let call = IERC20::balanceOfCall { account };
		let output = self
			.chain
			.view(SUBMITTER, self.token, &call.abi_encode())
			.unwrap();
		U256::abi_decode(&output).unwrap()
	}

	pub fn allowance(&mut self, owner: Address, spender: Address) -> U256 {
		let call = IERC20::allowanceCall { owner, spender };
		let output = self
			.chain
			.view(SUBMITTER, self.token, &call.abi_encode())
			.unwrap();
		U256::abi_decode(&output).unwrap()
	}

	pub fn is_settled(&mut self, order_hash: B256) -> bool {
		let call = IOrderReceiver::settledCall {
			orderHash: order_hash,
		};
		let output = self
			.chain
			.view(SUBMITTER, self.receiver, &call.abi_encode())
			.unwrap();
		bool::abi_decode(&output).unwrap()
	}

	/// Marks `order_hash` settled directly in the receiver.
	pub fn mark_settled(&mut self, order_hash: B256) {
		let call = IOrderReceiver::markSettledCall {
			orderHash: order_hash,
		};
		self.chain
			.transact(SUBMITTER, self.receiver, U256::ZERO, &call.abi_encode())
			.unwrap();
	}

	pub fn execute(&mut self, batch: Batch) -> Result<Receipt, ChainError> {
		self.chain
			.transact(SUBMITTER, self.executor, U256::ZERO, &batch.encode())
	}

	/// Tolerant `approve(spender, value)` call on the token.
	pub fn approve(&self, batch: Batch, spender: Address, value: U256) -> Batch {
		batch
			.call(self.token, &IERC20::approveCall { spender, value })
			.tolerant()
	}

	/// Order paid out of `adapter` to the resolver.
	pub fn order(&self, adapter: Address) -> Order {
		Order {
			fromActor: adapter,
			fromActorReceiver: address!("1101101101101101101101101101101101101101"),
			fromChain: U256::from(12_345u64),
			fromToken: self.token,
			fromAmount: U256::from(FROM_AMOUNT),
			toActor: self.resolver,
			toChain: U256::from(54_321u64),
			toToken: address!("3000300030003000300030003000300030003000"),
			toAmount: U256::from(2 * FROM_AMOUNT),
			collateralReceiver: address!("1001111001111010100011001000000000111111"),
			collateralChain: U256::from(55_555u64),
			collateralAmount: U256::from(17_823_000u64),
			collateralRewardable: U256::from(23_000u64),
			collateralUnlocked: U256::from(172_368_123u64),
			deadline: U256::from(2_000_000_000u64),
			timeToSend: U256::from(300u64),
			timeToLiqSend: U256::from(600u64),
			nonce: U256::from(1_337_133_713_371_337u64),
		}
	}
}

/// `receiveOrder(order, flags)` calldata; the order sits at offset 4.
pub fn resolver_payload(order: &Order, flow: ResolverFlow) -> Bytes {
	IResolverMock::receiveOrderCall {
		order: order.clone(),
		flowFlags: flow.flags(),
	}
	.abi_encode()
	.into()
}

/// `receiveOrderOffset36(prefix, order, flags, suffix)` calldata.
pub fn resolver_payload_36(order: &Order, flow: ResolverFlow) -> Bytes {
	IResolverMock::receiveOrderOffset36Call {
		prefix: B256::ZERO,
		order: order.clone(),
		flowFlags: flow.flags(),
		suffix: B256::ZERO,
	}
	.abi_encode()
	.into()
}

/// `receiveOrderOffset100(prefix, extra, tag, order, flags, suffix)` calldata.
pub fn resolver_payload_100(order: &Order, flow: ResolverFlow, extra: Bytes) -> Bytes {
	IResolverMock::receiveOrderOffset100Call {
		prefix: B256::repeat_byte(0x01),
		extra,
		tag: U256::from(7u64),
		order: order.clone(),
		flowFlags: flow.flags(),
		suffix: B256::repeat_byte(0x02),
	}
	.abi_encode()
	.into()
}

pub fn revert_flow() -> ResolverFlow {
	ResolverFlow {
		should_revert: true,
		ignore_receive: false,
	}
}

pub fn ignore_flow() -> ResolverFlow {
	ResolverFlow {
		should_revert: false,
		ignore_receive: true,
	}
}
