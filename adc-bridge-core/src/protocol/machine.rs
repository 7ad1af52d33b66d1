//! Bus transaction phases
//!
//! Tracks where the current transaction stands. The phase is a pure
//! function of the previous phase and the hardware event.

use adc_bridge_hal::{BusEvent, Direction};

/// Transaction phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolState {
    /// Power-on phase, no transaction seen yet
    Idle,
    /// Our address was matched, no data yet
    AddressMatched(Direction),
    /// Master is writing a channel selector
    Receiving,
    /// Master is reading the result
    Transmitting,
    /// Stop seen; the bus is idle again until the next address match
    Stopped,
}

impl ProtocolState {
    /// Check if no transaction is in progress
    pub fn is_idle(&self) -> bool {
        matches!(self, ProtocolState::Idle | ProtocolState::Stopped)
    }

    /// Process an event and return the next phase
    pub fn transition(self, event: BusEvent) -> Self {
        use BusEvent::*;
        use ProtocolState::*;

        match (self, event) {
            // A (repeated) start with our address opens a new phase from anywhere
            (_, BusEvent::AddressMatched(direction)) => ProtocolState::AddressMatched(direction),

            // Write direction
            (ProtocolState::AddressMatched(Direction::Write), ByteReceived(_)) => Receiving,
            (Receiving, ByteReceived(_)) => Receiving,

            // Read direction
            (ProtocolState::AddressMatched(Direction::Read), ReadyToTransmit) => Transmitting,
            (Transmitting, ReadyToTransmit) => Transmitting,

            (_, StopCondition) => Stopped,

            // Errors and out-of-phase events leave the phase alone
            _ => self,
        }
    }
}
