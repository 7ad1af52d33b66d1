//! Host simulation of the bridge hardware
//!
//! - [`SimBus`] models the slave peripheral's one-byte output staging
//!   register. Pushes into a full register are lost. An empty register
//!   while the master clocks a read is clock stretching.
//! - [`SimConverter`] models a single-channel converter with a raw code per
//!   physical channel and failure injection.
//! - [`Harness`] plays the bus master and the interrupt controller.

use std::vec::Vec;

use adc_bridge_hal::{
    BusEvent, Condition, ConversionError, Converter, Direction, PhysicalChannel, SlaveBus,
};

use crate::bridge::Bridge;
use crate::channel::ChannelMap;

/// Slave peripheral model
#[derive(Debug, Default)]
pub struct SimBus {
    staged: Option<u8>,
    nack_armed: bool,
    cleared: Vec<Condition>,
    pushes: usize,
    flushes: usize,
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Byte in the output staging register
    pub fn staged(&self) -> Option<u8> {
        self.staged
    }

    /// Take the staged byte onto the wire
    pub fn shift_out(&mut self) -> Option<u8> {
        self.staged.take()
    }

    /// Hardware re-arms acknowledgement on address match
    pub fn address_matched(&mut self) {
        self.nack_armed = false;
    }

    pub fn nack_armed(&self) -> bool {
        self.nack_armed
    }

    pub fn cleared(&self) -> &[Condition] {
        &self.cleared
    }

    /// Bytes accepted into the staging register
    pub fn pushes(&self) -> usize {
        self.pushes
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl SlaveBus for SimBus {
    fn push_byte(&mut self, byte: u8) {
        // Like TXDR, the register only takes a byte while empty
        if self.staged.is_none() {
            self.staged = Some(byte);
            self.pushes += 1;
        }
    }

    fn flush_tx(&mut self) {
        self.staged = None;
        self.flushes += 1;
    }

    fn clear(&mut self, condition: Condition) {
        self.cleared.push(condition);
    }

    fn nack_next(&mut self) {
        self.nack_armed = true;
    }
}

/// Converter model
#[derive(Debug, Default)]
pub struct SimConverter {
    codes: Vec<(PhysicalChannel, u16)>,
    selected: Vec<PhysicalChannel>,
    pending: Option<PhysicalChannel>,
    latched: Option<Result<u16, ConversionError>>,
    fail_next: Option<ConversionError>,
    starts: usize,
    reads: usize,
}

impl SimConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw code the converter returns for `channel`
    pub fn set_code(&mut self, channel: PhysicalChannel, code: u16) {
        self.codes.retain(|(c, _)| *c != channel);
        self.codes.push((channel, code));
    }

    /// Raw code for `channel`; unset channels get a distinct default
    pub fn code(&self, channel: PhysicalChannel) -> u16 {
        self.codes
            .iter()
            .find(|(c, _)| *c == channel)
            .map(|(_, code)| *code)
            .unwrap_or(match channel {
                PhysicalChannel::Input(n) => 0x0100 | n as u16,
                PhysicalChannel::SupplyMonitor(n) => 0x0200 | n as u16,
                PhysicalChannel::TemperatureSensor => 0x0300,
            })
    }

    /// Make the next finished conversion fail
    pub fn fail_next(&mut self, error: ConversionError) {
        self.fail_next = Some(error);
    }

    /// Channels currently enabled
    pub fn selected(&self) -> &[PhysicalChannel] {
        &self.selected
    }

    /// Finish the running conversion
    ///
    /// Returns false if nothing was running.
    pub fn finish(&mut self) -> bool {
        let Some(channel) = self.pending.take() else {
            return false;
        };
        self.latched = Some(match self.fail_next.take() {
            Some(error) => Err(error),
            None => Ok(self.code(channel)),
        });
        true
    }

    pub fn starts(&self) -> usize {
        self.starts
    }

    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl Converter for SimConverter {
    fn configure(&mut self, channel: PhysicalChannel, selected: bool) {
        self.selected.retain(|c| *c != channel);
        if selected {
            self.selected.push(channel);
        }
    }

    fn start(&mut self) {
        assert_eq!(
            self.selected.len(),
            1,
            "conversion started with {:?} enabled",
            self.selected
        );
        // Starting again abandons the running conversion
        self.pending = Some(self.selected[0]);
        self.starts += 1;
    }

    fn read(&mut self) -> Result<u16, ConversionError> {
        self.reads += 1;
        self.latched.take().unwrap_or(Err(ConversionError::NoData))
    }
}

/// Bus master and interrupt controller
pub struct Harness {
    pub bridge: Bridge<SimBus, SimConverter>,
}

impl Harness {
    /// Bridge with the reference channel map
    pub fn new() -> Self {
        Self::with_map(ChannelMap::default())
    }

    pub fn with_map(map: ChannelMap) -> Self {
        Self {
            bridge: Bridge::new(SimBus::new(), SimConverter::new(), map),
        }
    }

    pub fn set_code(&mut self, channel: PhysicalChannel, code: u16) {
        self.bridge.converter_mut().set_code(channel, code);
    }

    /// Start condition plus our address
    pub fn address(&mut self, direction: Direction) {
        self.bridge.bus_mut().address_matched();
        self.bridge.on_bus_event(BusEvent::AddressMatched(direction));
    }

    pub fn stop(&mut self) {
        self.bridge.on_bus_event(BusEvent::StopCondition);
    }

    /// Complete write transaction of one selector byte
    pub fn write(&mut self, selector: u8) {
        self.address(Direction::Write);
        self.bridge.on_bus_event(BusEvent::ByteReceived(selector));
        self.stop();
    }

    pub fn begin_read(&mut self) {
        self.address(Direction::Read);
    }

    /// Clock one byte of a read
    ///
    /// Returns `None` while the slave stretches the clock.
    pub fn clock_byte(&mut self) -> Option<u8> {
        if self.bridge.bus().staged().is_none() {
            self.bridge.on_bus_event(BusEvent::ReadyToTransmit);
        }
        self.bridge.bus_mut().shift_out()
    }

    /// Complete two-byte read transaction
    ///
    /// Returns `None` if either byte stalled.
    pub fn read(&mut self) -> Option<[u8; 2]> {
        self.begin_read();
        let low = self.clock_byte();
        let high = low.and_then(|_| self.clock_byte());
        self.stop();
        Some([low?, high?])
    }

    /// Let the converter finish and raise its interrupt
    ///
    /// Returns false if no conversion was running.
    pub fn convert(&mut self) -> bool {
        if self.bridge.converter_mut().finish() {
            self.bridge.on_conversion_complete();
            true
        } else {
            false
        }
    }
}
