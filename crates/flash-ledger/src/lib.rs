//! Reference collaborators the settlement adapters talk to.
//!
//! - [`Erc20Token`]: token ledger with balances, allowances and open minting.
//! - [`OrderReceiver`]: per-order settled flags, each set at most once.
//! - [`ResolverMock`]: resolver that acknowledges the orders it receives,
//!   with flags to make it revert or stay silent.

pub mod receiver;
pub mod resolver;
pub mod token;

pub use receiver::OrderReceiver;
pub use resolver::{ResolverFlow, ResolverMock};
pub use token::Erc20Token;
