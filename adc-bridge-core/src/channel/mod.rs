//! Channel addressing
//!
//! Maps the bus-facing logical channel index onto converter channels.

pub mod map;

pub use map::{ChannelMap, DEFAULT_CHANNELS, MAX_CHANNELS};
