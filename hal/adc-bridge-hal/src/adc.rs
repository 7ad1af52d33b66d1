//! Analog converter abstractions
//!
//! The converter samples exactly one physical channel per conversion.
//! Conversions are started from interrupt context and finish
//! asynchronously; the chip HAL raises an interrupt on completion and the
//! bridge then collects the value with [`Converter::read`].

/// Physical converter channel
///
/// Regular inputs and the supply monitor are numbered the way the chip's
/// reference manual numbers them. The internal temperature sensor has a
/// chip-specific channel number, resolved by the chip HAL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhysicalChannel {
    /// External analog input pin
    Input(u8),
    /// Supply-voltage monitor (external divider on an input pin)
    SupplyMonitor(u8),
    /// Internal temperature sensor
    TemperatureSensor,
}

impl PhysicalChannel {
    /// Input pin number, if this channel is wired to a pin
    pub fn pin_channel(&self) -> Option<u8> {
        match self {
            PhysicalChannel::Input(n) | PhysicalChannel::SupplyMonitor(n) => Some(*n),
            PhysicalChannel::TemperatureSensor => None,
        }
    }
}

/// Errors a conversion can end with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionError {
    /// A new result overwrote one that was never read
    Overrun,
    /// Completion signalled but no data available
    NoData,
}

/// Single-channel analog converter
///
/// Methods run in interrupt context and must not wait on the conversion
/// itself. A bounded register handshake (a few converter clock cycles, such
/// as aborting a running conversion before reselecting channels) is allowed.
pub trait Converter {
    /// Include or exclude a physical channel from the next conversion
    fn configure(&mut self, channel: PhysicalChannel, selected: bool);

    /// Start one asynchronous conversion of the selected channel
    fn start(&mut self);

    /// Read the result of the last finished conversion
    fn read(&mut self) -> Result<u16, ConversionError>;
}
