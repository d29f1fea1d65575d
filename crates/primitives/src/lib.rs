//! # sabre-primitives
//!
//! Base types shared across sabre crates. Mostly re-exports of
//! [`alloy_primitives`], plus the [`hardfork`] identifiers.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

pub mod hardfork;

pub use alloy_primitives;
pub use alloy_primitives::{
    address, b256, fixed_bytes, hex, keccak256, uint, Address, Bytes, FixedBytes, B256, U256,
};
pub use alloy_primitives::map::{self, hash_map, hash_set, HashMap, HashSet};
pub use hex_literal;
