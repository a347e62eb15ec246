// crates/ap_algo/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

// Core roster types (callers usually import these through this crate)
pub use ap_core::{entities::EntityItem, tokens::EntityId};

// ----------------------------- Apportionment (public surface) ------------------------

pub mod apportion;

// Re-export the entry point and its error for ergonomic matching in callers.
pub use apportion::{apportion_equal_proportions, ApportionError};
