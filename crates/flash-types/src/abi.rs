//! Solidity ABI definitions for the Flash settlement contracts.
//!
//! Everything that crosses a call frame boundary is described here with
//! `sol!` so that calldata, return data, events and revert payloads share
//! one canonical encoding. Field and argument names follow the on-chain
//! naming so off-chain tooling can pattern-match on them.

use alloy_sol_types::sol;

sol! {
	/// Off-chain agreed description of a cross-chain asset exchange.
	///
	/// Every member is a single 32-byte slot when ABI encoded, so the struct
	/// always lives in the static head of a call's arguments.
	#[derive(Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
	struct Order {
		address fromActor;
		address fromActorReceiver;
		uint256 fromChain;
		address fromToken;
		uint256 fromAmount;
		address toActor;
		uint256 toChain;
		address toToken;
		uint256 toAmount;
		address collateralReceiver;
		uint256 collateralChain;
		uint256 collateralAmount;
		uint256 collateralRewardable;
		uint256 collateralUnlocked;
		uint256 deadline;
		uint256 timeToSend;
		uint256 timeToLiqSend;
		uint256 nonce;
	}

	/// One unit of a batch submitted to the call executor.
	#[derive(Debug, Default, PartialEq, Eq)]
	struct Call {
		address target;
		uint256 value;
		bytes callData;
		bool allowFailure;
		bool isDelegateCall;
	}

	/// Batched call executor.
	interface ICallExecutor {
		function executeCalls(Call[] calls) external payable;

		error DelegateCallWithValue(uint256 index);
	}

	/// Token ledger collaborator.
	interface IERC20 {
		function totalSupply() external view returns (uint256);
		function balanceOf(address account) external view returns (uint256);
		function allowance(address owner, address spender) external view returns (uint256);
		function approve(address spender, uint256 value) external returns (bool);
		function transfer(address to, uint256 value) external returns (bool);
		function transferFrom(address from, address to, uint256 value) external returns (bool);
		function mint(address account, uint256 value) external;

		event Transfer(address indexed from, address indexed to, uint256 value);
		event Approval(address indexed owner, address indexed spender, uint256 value);

		error ERC20InsufficientBalance(address sender, uint256 balance, uint256 needed);
		error ERC20InsufficientAllowance(address spender, uint256 allowance, uint256 needed);
		error ERC20InvalidReceiver(address receiver);
	}

	/// Order receipt ledger holding the per-order settled flag.
	interface IOrderReceiver {
		function settled(bytes32 orderHash) external view returns (bool);
		function markSettled(bytes32 orderHash) external;

		event OrderSettled(bytes32 indexed orderHash, address indexed resolver);
	}

	/// Settlement adapter for fully specified orders.
	interface IFixedSettlementAdapter {
		function receiveDelegateAsset(
			address token,
			uint256 amount,
			uint256 minBalanceAfter,
			bytes32 orderHash,
			address resolver,
			bytes resolverData
		) external;

		event Settled(bytes32 indexed orderHash);
	}

	/// Settlement adapter for orders topped up at execution time.
	interface IDynamicSettlementAdapter {
		function receiveDelegateAsset(
			uint256 maxExtraFromAmount,
			uint256 minBalanceAfter,
			bytes32 baseOrderHash,
			bytes32 resolverDescriptor,
			bytes resolverData
		) external;
		function receivedOrderHash(bytes32 baseOrderHash) external view returns (bytes32);

		event DynamicSettled(bytes32 indexed baseOrderHash, bytes32 indexed orderHash);
	}

	/// Failure kinds raised by the settlement adapters.
	interface IFlashErrors {
		error AlreadySettled(bytes32 orderHash);
		error InsufficientBalanceAfter(uint256 actual, uint256 required);
		error NotSettled(bytes32 orderHash);
		error AlreadyReceived(bytes32 baseOrderHash);
		error TruncatedPayload(uint256 offset, uint256 required, uint256 actual);
		error RateOverflow();
		error SafeERC20FailedOperation(address token);
	}

	/// Reference resolver entry points, each embedding the order at a
	/// different byte offset of its calldata (4, 36 and 100).
	interface IResolverMock {
		function receiveOrder(Order order, uint256 flowFlags) external;
		function receiveOrderOffset36(bytes32 prefix, Order order, uint256 flowFlags, bytes32 suffix) external;
		function receiveOrderOffset100(
			bytes32 prefix,
			bytes extra,
			uint256 tag,
			Order order,
			uint256 flowFlags,
			bytes32 suffix
		) external;

		error ResolverTestError();
	}
}
