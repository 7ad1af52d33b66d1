//! I2C slave abstractions
//!
//! The bridge acts as an I2C slave. The peripheral reports what happened on
//! the bus as a [`BusEvent`]; the protocol reacts through [`SlaveBus`].

/// Transfer direction seen from the master, taken from the R/W bit of the
/// address byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Master writes to us
    Write,
    /// Master reads from us
    Read,
}

/// Hardware events raised by the slave peripheral
///
/// One interrupt may carry several events. Chip HALs emit them in the
/// order address, transmit, receive, stop, errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusEvent {
    /// Our own address was matched
    AddressMatched(Direction),
    /// A data byte arrived from the master
    ByteReceived(u8),
    /// The output staging register is empty and the master wants data
    ReadyToTransmit,
    /// Stop condition detected
    StopCondition,
    /// Master did not acknowledge the last byte we sent
    NotAcknowledged,
    /// Receive overrun or transmit underrun
    Overrun,
}

/// Condition flags that must be cleared by software
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Condition {
    /// Address matched (clearing releases the clock after addressing)
    AddressMatch,
    /// Stop detected
    Stop,
    /// Not-acknowledge received
    NotAcknowledged,
    /// Overrun/underrun
    Overrun,
}

/// I2C slave output path
///
/// Every method must return immediately; they are called from interrupt
/// context.
pub trait SlaveBus {
    /// Place a byte in the output staging register
    ///
    /// If the master is currently being held by clock stretching, this is
    /// what releases it.
    fn push_byte(&mut self, byte: u8);

    /// Discard whatever sits in the output staging register
    fn flush_tx(&mut self);

    /// Clear a condition flag
    fn clear(&mut self, condition: Condition);

    /// Refuse the next data byte
    ///
    /// The peripheral re-arms itself on the next address match.
    fn nack_next(&mut self);
}

/// I2C slave configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cSlaveConfig {
    /// 7-bit own address
    pub address: u8,
    /// Allow the peripheral to stretch the clock
    pub clock_stretching: bool,
}

impl Default for I2cSlaveConfig {
    fn default() -> Self {
        Self {
            address: 0x50,
            clock_stretching: true,
        }
    }
}
