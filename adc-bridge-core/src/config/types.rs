//! Bridge configuration and validation

use adc_bridge_hal::PhysicalChannel;

use crate::channel::{ChannelMap, DEFAULT_CHANNELS};

/// Lowest non-reserved 7-bit address
pub const MIN_ADDRESS: u8 = 0x08;

/// Highest non-reserved 7-bit address
pub const MAX_ADDRESS: u8 = 0x77;

/// Lowest (least urgent) priority level on a Cortex-M0 (2 priority bits)
pub const LOWEST_PRIORITY: u8 = 3;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Address is in one of the reserved ranges (0x00-0x07, 0x78-0x7F)
    ReservedAddress(u8),
    /// Address does not fit in 7 bits
    AddressOutOfRange(u8),
    /// Priority level not representable in the NVIC
    PriorityOutOfRange(u8),
    /// The converter must preempt the bus handler
    PriorityInversion {
        /// Configured converter priority
        adc: u8,
        /// Configured bus priority
        bus: u8,
    },
    /// Channel table is empty
    NoChannels,
    /// Channel table exceeds the map capacity
    TooManyChannels(usize),
    /// Physical channel listed twice
    DuplicateChannel(PhysicalChannel),
}

/// Bridge configuration
///
/// Priorities follow the Cortex-M convention: a lower number is more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BridgeConfig {
    /// 7-bit slave address
    pub own_address: u8,
    /// NVIC priority of the bus event interrupt
    pub bus_priority: u8,
    /// NVIC priority of the conversion-complete interrupt
    pub adc_priority: u8,
    /// Physical channel for each logical index
    pub channels: &'static [PhysicalChannel],
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BridgeConfig {
    /// Reference board: address 0x50, converter at 2, bus at 3
    pub const DEFAULT: Self = Self {
        own_address: 0x50,
        bus_priority: 3,
        adc_priority: 2,
        channels: &DEFAULT_CHANNELS,
    };

    /// Check the configuration without building anything
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_address(self.own_address)?;
        validate_priorities(self.adc_priority, self.bus_priority)?;
        ChannelMap::new(self.channels)?;
        Ok(())
    }

    /// Validate and build the channel map
    pub fn channel_map(&self) -> Result<ChannelMap, ConfigError> {
        self.validate()?;
        ChannelMap::new(self.channels)
    }
}

/// Validate a 7-bit slave address
pub fn validate_address(address: u8) -> Result<(), ConfigError> {
    if address > 0x7F {
        return Err(ConfigError::AddressOutOfRange(address));
    }
    if !(MIN_ADDRESS..=MAX_ADDRESS).contains(&address) {
        return Err(ConfigError::ReservedAddress(address));
    }
    Ok(())
}

/// Validate the interrupt priority ordering
///
/// The completion handler must strictly preempt the bus handler.
pub fn validate_priorities(adc: u8, bus: u8) -> Result<(), ConfigError> {
    if adc > LOWEST_PRIORITY {
        return Err(ConfigError::PriorityOutOfRange(adc));
    }
    if bus > LOWEST_PRIORITY {
        return Err(ConfigError::PriorityOutOfRange(bus));
    }
    if adc >= bus {
        return Err(ConfigError::PriorityInversion { adc, bus });
    }
    Ok(())
}
