//! Bus slave protocol
//!
//! One-byte channel select on write, two-byte little-endian result on read.

pub mod machine;

pub use adc_bridge_hal::{BusEvent, Direction};
pub use machine::ProtocolState;
