//! Low-level primitives shared by the driver and firmware crates.
//!
//! - [`sync`]: interrupt-aware locking
//! - [`arch`]: per-architecture interrupt masking

#![cfg_attr(not(test), no_std)]

pub mod arch;
pub mod sync;
