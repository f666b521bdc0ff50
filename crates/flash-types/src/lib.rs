//! Shared types for the Flash settlement system.
//!
//! This crate holds the ABI surface every other crate speaks (the `Order`
//! struct, batch `Call`s, contract interfaces, events and custom errors), the
//! raw [`Revert`] payload used to propagate failures verbatim across call
//! frames, and the configuration schema validator.

pub mod abi;
pub mod order;
pub mod revert;
pub mod validation;

pub use abi::*;
pub use order::*;
pub use revert::*;
pub use validation::*;
