//! Logical to physical channel map
//!
//! The master addresses channels by a small logical index. The map turns
//! that index into the converter's physical channel and drives the
//! one-channel-enabled fan-out used when arming a conversion.

use adc_bridge_hal::PhysicalChannel;
use heapless::Vec;

use crate::config::ConfigError;

/// Maximum entries in a channel map
pub const MAX_CHANNELS: usize = 16;

/// Channel wiring of the reference board
pub const DEFAULT_CHANNELS: [PhysicalChannel; 7] = [
    PhysicalChannel::Input(0),         // 0 = "ADC0"
    PhysicalChannel::Input(1),         // 1 = "ADC1"
    PhysicalChannel::Input(4),         // 2 = "ADC2"
    PhysicalChannel::Input(5),         // 3 = "ADC3/SOIL1"
    PhysicalChannel::Input(6),         // 4 = "ADC4/SOIL2"
    PhysicalChannel::SupplyMonitor(9), // 5 = battery voltage
    PhysicalChannel::TemperatureSensor,
];

/// Ordered table of physical channels, indexed by logical channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMap {
    entries: Vec<PhysicalChannel, MAX_CHANNELS>,
}

impl Default for ChannelMap {
    fn default() -> Self {
        let mut entries = Vec::new();
        for channel in DEFAULT_CHANNELS {
            // DEFAULT_CHANNELS is shorter than MAX_CHANNELS
            let _ = entries.push(channel);
        }
        Self { entries }
    }
}

impl ChannelMap {
    /// Build a map from a configured table
    ///
    /// Rejects empty tables, tables longer than [`MAX_CHANNELS`], and
    /// tables naming the same physical channel (or input pin) twice.
    pub fn new(channels: &[PhysicalChannel]) -> Result<Self, ConfigError> {
        if channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }
        if channels.len() > MAX_CHANNELS {
            return Err(ConfigError::TooManyChannels(channels.len()));
        }

        let mut entries: Vec<PhysicalChannel, MAX_CHANNELS> = Vec::new();
        for &channel in channels {
            if entries.iter().any(|existing| same_source(*existing, channel)) {
                return Err(ConfigError::DuplicateChannel(channel));
            }
            entries
                .push(channel)
                .map_err(|_| ConfigError::TooManyChannels(channels.len()))?;
        }

        Ok(Self { entries })
    }

    /// Number of logical channels (N)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Physical channel for a logical index
    pub fn resolve(&self, logical: u8) -> Option<PhysicalChannel> {
        self.entries.get(logical as usize).copied()
    }

    /// All physical channels in logical order
    pub fn iter(&self) -> impl Iterator<Item = PhysicalChannel> + '_ {
        self.entries.iter().copied()
    }

    /// Every mapped channel paired with whether it is the `target`
    ///
    /// The converter supports one active channel, so arming walks the whole
    /// table and switches stale selections off.
    pub fn fan_out(
        &self,
        target: PhysicalChannel,
    ) -> impl Iterator<Item = (PhysicalChannel, bool)> + '_ {
        self.iter().map(move |channel| (channel, channel == target))
    }
}

/// Two entries that select the same converter input
fn same_source(a: PhysicalChannel, b: PhysicalChannel) -> bool {
    match (a.pin_channel(), b.pin_channel()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ChannelMap {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ChannelMap[");
        for (i, channel) in self.entries.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}={}", i, channel);
        }
        defmt::write!(f, "]");
    }
}
