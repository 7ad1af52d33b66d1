//! Configuration types
//!
//! Board-agnostic bridge configuration. The firmware generates a
//! [`BridgeConfig`] constant from `bridge.toml` at build time and validates
//! it again at boot.

pub mod types;

pub use types::*;
