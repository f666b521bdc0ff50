//! Batched call execution.
//!
//! [`CallExecutor`] runs an ordered list of [`Call`]s inside one
//! transaction. [`Batch`] builds that list off-chain.
//!
//! [`Call`]: flash_types::Call

pub mod batch;
pub mod executor;

pub use batch::Batch;
pub use executor::{execute_calls, CallExecutor};
