//! Settlement adapters.
//!
//! Both adapters follow the same protocol around the shared settled flag:
//! refuse an order that is already settled, pull the committed amount from
//! the caller, check the caller's remaining balance, hand control to the
//! resolver, and only succeed if the resolver acknowledged the order. Any
//! failure reverts the whole transaction, so the transfer and the flag
//! always move together.

mod guard;

pub mod dynamic;
pub mod fixed;

pub use dynamic::{DynamicSettlementAdapter, TopUpPolicy};
pub use fixed::FixedSettlementAdapter;
