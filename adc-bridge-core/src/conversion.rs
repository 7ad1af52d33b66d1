//! Conversion controller
//!
//! Owns the converter and tracks the single conversion in flight.
//! Arming reprograms the converter through the channel map fan-out and
//! starts an asynchronous conversion. Completion hands back the reading
//! together with the channel it was armed for.

use adc_bridge_hal::{ConversionError, Converter, PhysicalChannel};

use crate::channel::ChannelMap;

/// Outcome of a completion interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Completion {
    /// The armed conversion finished
    Finished {
        /// Channel the conversion was armed for
        channel: PhysicalChannel,
        /// Raw code, or the converter's failure
        reading: Result<u16, ConversionError>,
    },
    /// Nothing was in flight (disowned or never armed); reading discarded
    Spurious,
}

/// Drives the converter for one channel at a time
pub struct ConversionController<C> {
    converter: C,
    in_flight: Option<PhysicalChannel>,
}

impl<C: Converter> ConversionController<C> {
    /// Create an idle controller
    pub fn new(converter: C) -> Self {
        Self {
            converter,
            in_flight: None,
        }
    }

    /// Configure the converter for `channel` alone and start a conversion
    ///
    /// Every channel in `map` is visited so a selection left over from the
    /// previous arm is switched off. Returns the channel whose pending
    /// conversion was superseded, if any.
    pub fn arm(&mut self, map: &ChannelMap, channel: PhysicalChannel) -> Option<PhysicalChannel> {
        for (entry, selected) in map.fan_out(channel) {
            self.converter.configure(entry, selected);
        }
        let superseded = self.in_flight.replace(channel);
        self.converter.start();
        superseded
    }

    /// Stop caring about the conversion in flight
    ///
    /// The conversion still runs to completion in hardware; its completion
    /// is then reported as [`Completion::Spurious`].
    pub fn disown(&mut self) -> Option<PhysicalChannel> {
        self.in_flight.take()
    }

    /// Collect the result of the conversion in flight
    ///
    /// Always reads the converter so the hardware completion flag is
    /// acknowledged, even when the result is discarded.
    pub fn complete(&mut self) -> Completion {
        let reading = self.converter.read();
        match self.in_flight.take() {
            Some(channel) => Completion::Finished { channel, reading },
            None => Completion::Spurious,
        }
    }

    /// Channel currently being converted
    pub fn in_flight(&self) -> Option<PhysicalChannel> {
        self.in_flight
    }

    /// Check if a conversion is pending
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Access the converter
    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// Mutable access to the converter
    pub fn converter_mut(&mut self) -> &mut C {
        &mut self.converter
    }
}
