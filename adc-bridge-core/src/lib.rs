//! Board-agnostic core logic for the I2C ADC bridge
//!
//! A bus master writes a one-byte logical channel index, the bridge converts
//! that channel, and a following two-byte read returns the result low byte
//! first. This crate holds everything that does not depend on a specific
//! chip:
//!
//! - Channel map (logical index to physical converter channel)
//! - Shared register file (selector, result, transmit cursor)
//! - Conversion controller (one conversion in flight)
//! - Bus protocol state machine and the [`Bridge`] interrupt entry points
//! - Configuration types and validation
//!
//! The core takes no locks. The firmware serializes the two entry points and
//! gives the converter interrupt the higher priority, so a completion that
//! becomes pending during a bus event runs right after it; see [`register`]
//! for which entry point owns which field.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bridge;
pub mod channel;
pub mod config;
pub mod conversion;
pub mod protocol;
pub mod register;
pub mod stats;

#[cfg(test)]
mod properties;
#[cfg(test)]
mod sim;

pub use bridge::Bridge;
pub use channel::ChannelMap;
pub use config::{BridgeConfig, ConfigError};
pub use register::{RegisterFile, TransmitCursor, SENTINEL};
pub use stats::BridgeStats;
