//! Order identity and payload codec.
//!
//! This module computes the EIP-712 identity of an [`Order`] and implements
//! the dynamic resolver descriptor: a single word that names a resolver and
//! the byte offset at which an order sits inside that resolver's calldata.
//!
//! [`Order`]: flash_types::Order

pub mod hasher;
pub mod resolver;

pub use hasher::{domain_separator, hash_order, FLASH_DOMAIN};
pub use resolver::{CodecError, DynamicResolver, SlotCursor, TruncatedPayload, MAX_ORDER_OFFSET};
