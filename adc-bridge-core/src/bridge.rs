//! Bridge device state and interrupt entry points
//!
//! [`Bridge`] is the single device instance. The firmware hands it to the
//! two interrupt handlers by exclusive reference:
//!
//! - [`Bridge::on_bus_event`] from the bus interrupt (lower priority)
//! - [`Bridge::on_conversion_complete`] from the converter interrupt
//!   (higher priority)
//!
//! Neither entry point blocks. A read that arrives before the conversion
//! finishes is held by the bus hardware (clock stretching) until the
//! completion handler pushes the first result byte.

use adc_bridge_hal::{BusEvent, Condition, Converter, Direction, SlaveBus};

use crate::channel::ChannelMap;
use crate::config::{BridgeConfig, ConfigError};
use crate::conversion::{Completion, ConversionController};
use crate::protocol::ProtocolState;
use crate::register::RegisterFile;
use crate::stats::{bump, BridgeStats};

/// I2C-to-ADC bridge
pub struct Bridge<B, C> {
    bus: B,
    controller: ConversionController<C>,
    map: ChannelMap,
    regs: RegisterFile,
    state: ProtocolState,
    stats: BridgeStats,
}

impl<B: SlaveBus, C: Converter> Bridge<B, C> {
    /// Create a bridge in its power-on state
    pub fn new(bus: B, converter: C, map: ChannelMap) -> Self {
        Self {
            bus,
            controller: ConversionController::new(converter),
            map,
            regs: RegisterFile::new(),
            state: ProtocolState::Idle,
            stats: BridgeStats::default(),
        }
    }

    /// Create a bridge from a validated configuration
    pub fn from_config(bus: B, converter: C, config: &BridgeConfig) -> Result<Self, ConfigError> {
        let map = config.channel_map()?;
        Ok(Self::new(bus, converter, map))
    }

    /// Bus interrupt entry point
    pub fn on_bus_event(&mut self, event: BusEvent) {
        self.state = self.state.transition(event);

        match (self.state, event) {
            (_, BusEvent::AddressMatched(direction)) => self.on_address(direction),
            (ProtocolState::Receiving, BusEvent::ByteReceived(byte)) => self.on_byte(byte),
            (ProtocolState::Transmitting, BusEvent::ReadyToTransmit) => {
                self.on_ready_to_transmit()
            }
            // Out-of-phase data events (no address seen, or the wrong
            // direction) are dropped
            (_, BusEvent::ByteReceived(_)) | (_, BusEvent::ReadyToTransmit) => {}
            (_, BusEvent::StopCondition) => self.on_stop(),
            (_, BusEvent::NotAcknowledged) => self.bus.clear(Condition::NotAcknowledged),
            (_, BusEvent::Overrun) => self.bus.clear(Condition::Overrun),
        }
    }

    /// Converter interrupt entry point
    pub fn on_conversion_complete(&mut self) {
        match self.controller.complete() {
            Completion::Finished {
                reading: Ok(value), ..
            } => {
                self.regs.load_result(value);
                bump(&mut self.stats.completed);
            }
            Completion::Finished { reading: Err(_), .. } => {
                self.regs.load_sentinel();
                bump(&mut self.stats.failed);
            }
            Completion::Spurious => {
                bump(&mut self.stats.spurious);
                return;
            }
        }

        // Queue the low byte now: a read that is already waiting is
        // released by this push. The staging register only accepts a byte
        // while empty, so drop anything an earlier result left there.
        if let Some(byte) = self.regs.next_byte() {
            self.bus.flush_tx();
            self.bus.push_byte(byte);
            self.regs.mark_primed();
        }
    }

    fn on_address(&mut self, direction: Direction) {
        self.bus.clear(Condition::AddressMatch);

        if direction == Direction::Read && !self.regs.take_primed() {
            // Whatever is staged belongs to an earlier transaction
            self.bus.flush_tx();
        }
    }

    fn on_byte(&mut self, byte: u8) {
        self.regs.latch_selector(byte);

        match self.map.resolve(byte) {
            Some(channel) => {
                self.regs.await_conversion();
                if self.controller.arm(&self.map, channel).is_some() {
                    bump(&mut self.stats.superseded);
                }
                bump(&mut self.stats.armed);
            }
            None => {
                // A late completion must not overwrite the sentinel
                if self.controller.disown().is_some() {
                    bump(&mut self.stats.superseded);
                }
                self.regs.load_sentinel();
                bump(&mut self.stats.invalid);
            }
        }
    }

    fn on_ready_to_transmit(&mut self) {
        // The staging register is empty, so any primed byte has gone out
        self.regs.take_primed();

        // NotReady or drained: push nothing and let the hardware stretch
        if let Some(byte) = self.regs.next_byte() {
            self.bus.push_byte(byte);
        }
    }

    fn on_stop(&mut self) {
        self.bus.nack_next();
        self.bus.clear(Condition::Stop);
    }

    /// Current transaction phase
    pub fn state(&self) -> ProtocolState {
        self.state
    }

    /// Register file snapshot
    pub fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    /// Activity counters
    pub fn stats(&self) -> BridgeStats {
        self.stats
    }

    /// Channel map in use
    pub fn channel_map(&self) -> &ChannelMap {
        &self.map
    }

    /// Conversion controller
    pub fn controller(&self) -> &ConversionController<C> {
        &self.controller
    }

    /// Access the bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable access to the bus
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Mutable access to the converter
    pub fn converter_mut(&mut self) -> &mut C {
        self.controller.converter_mut()
    }
}
