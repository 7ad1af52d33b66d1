//! I2C slave driver for STM32F0
//!
//! Interrupt-driven slave on the I2C v2 peripheral. The driver only
//! translates between ISR/ICR/TXDR/RXDR bits and the bridge's
//! [`BusEvent`]/[`SlaveBus`] vocabulary; all protocol decisions happen in
//! `adc-bridge-core`.

use adc_bridge_hal::i2c::I2cSlaveConfig;
use adc_bridge_hal::{BusEvent, Condition, Direction, SlaveBus};
use embassy_stm32::pac;
use embassy_stm32::pac::i2c::regs::{Oar1, Timingr};
use embassy_stm32::pac::i2c::vals::Dir;
use heapless::Vec;

/// Distinct events one interrupt can report
pub const MAX_EVENTS_PER_IRQ: usize = 6;

/// TIMINGR value used on the reference board
pub const DEFAULT_TIMING: u32 = 0x2000_090E;

/// OAR1.OA1EN
const OA1EN: u32 = 1 << 15;

/// I2C slave on one I2C instance
pub struct I2cSlave {
    regs: pac::i2c::I2c,
}

impl I2cSlave {
    /// Configure and enable the peripheral as a 7-bit slave
    ///
    /// The peripheral clock must already be running. Enables the ADDR,
    /// RXNE, TXIS, STOP, NACK, TC and error interrupt sources; the NVIC
    /// line is left to the caller.
    pub fn new(regs: pac::i2c::I2c, config: I2cSlaveConfig, timing: u32) -> Self {
        regs.cr1().modify(|w| w.set_pe(false));

        regs.timingr().write_value(Timingr(timing));

        // OA1 must be disabled while it is written
        regs.oar1().write_value(Oar1(0));
        regs.oar1()
            .write_value(Oar1(OA1EN | ((config.address as u32) << 1)));

        regs.cr1().modify(|w| {
            w.set_nostretch(!config.clock_stretching);
            w.set_gcen(false);
            w.set_errie(true);
            w.set_tcie(true);
            w.set_stopie(true);
            w.set_nackie(true);
            w.set_addrie(true);
            w.set_txie(true);
            w.set_rxie(true);
        });

        regs.cr1().modify(|w| w.set_pe(true));

        Self { regs }
    }

    /// Snapshot the status register and translate it into events
    ///
    /// Reading a received byte clears RXNE, so each byte is reported once.
    /// A transmit request is suppressed when a stop is also pending.
    pub fn pending_events(&mut self) -> Vec<BusEvent, MAX_EVENTS_PER_IRQ> {
        let isr = self.regs.isr().read();
        let mut events = Vec::new();

        let direction = if isr.dir() == Dir::READ {
            Direction::Read
        } else {
            Direction::Write
        };

        // Capacity covers every flag checked below
        if isr.addr() {
            let _ = events.push(BusEvent::AddressMatched(direction));
        }
        if isr.txis() && !isr.stopf() {
            let _ = events.push(BusEvent::ReadyToTransmit);
        }
        if isr.rxne() {
            let byte = self.regs.rxdr().read().rxdata();
            let _ = events.push(BusEvent::ByteReceived(byte));
        }
        if isr.stopf() {
            let _ = events.push(BusEvent::StopCondition);
        }
        if isr.nackf() {
            let _ = events.push(BusEvent::NotAcknowledged);
        }
        if isr.ovr() {
            let _ = events.push(BusEvent::Overrun);
        }

        events
    }

    /// Clear bus and arbitration errors the bridge does not model
    pub fn clear_line_errors(&mut self) {
        self.regs.icr().write(|w| {
            w.set_berrcf(true);
            w.set_arlocf(true);
        });
    }
}

impl SlaveBus for I2cSlave {
    fn push_byte(&mut self, byte: u8) {
        self.regs.txdr().write(|w| w.set_txdata(byte));
    }

    fn flush_tx(&mut self) {
        // Setting TXE discards the TXDR contents
        self.regs.isr().modify(|w| w.set_txe(true));
    }

    fn clear(&mut self, condition: Condition) {
        self.regs.icr().write(|w| match condition {
            Condition::AddressMatch => w.set_addrcf(true),
            Condition::Stop => w.set_stopcf(true),
            Condition::NotAcknowledged => w.set_nackcf(true),
            Condition::Overrun => w.set_ovrcf(true),
        });
    }

    fn nack_next(&mut self) {
        // Cleared by hardware on the next address match
        self.regs.cr2().modify(|w| w.set_nack(true));
    }
}
