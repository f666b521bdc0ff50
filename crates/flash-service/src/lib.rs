//! Command-line front end for the Flash settlement crates.
//!
//! # Components
//!
//! - `cli`: Command-line interface definitions
//! - `inspect`: Offline order hashing, descriptor and payload helpers
//! - `logging`: Tracing subscriber setup
//! - `simulation`: End-to-end settlement scenario on an in-memory chain

pub mod cli;
pub mod inspect;
pub mod logging;
pub mod simulation;
