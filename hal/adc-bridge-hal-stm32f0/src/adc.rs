//! ADC driver for STM32F0
//!
//! STM32F0 has a single 12-bit ADC with 16 external inputs (ADC_IN0-15)
//! and the internal temperature sensor on channel 16.
//! Conversions are single-shot, selected through CHSELR, and signal the
//! end of conversion (EOC) by interrupt.

use adc_bridge_hal::{ConversionError, Converter, PhysicalChannel};
use embassy_stm32::pac;
use embassy_stm32::pac::adc::regs::{Chselr, Smpr};

/// Internal temperature sensor channel
pub const TEMPERATURE_CHANNEL: u8 = 16;

/// Sampling time in ADC clock cycles (SMPR.SMP)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SampleTime {
    Cycles1_5 = 0,
    Cycles7_5 = 1,
    Cycles13_5 = 2,
    Cycles28_5 = 3,
    Cycles41_5 = 4,
    Cycles55_5 = 5,
    Cycles71_5 = 6,
    Cycles239_5 = 7,
}

impl Default for SampleTime {
    fn default() -> Self {
        SampleTime::Cycles71_5
    }
}

/// CHSELR bit number for a physical channel
pub fn channel_number(channel: PhysicalChannel) -> u8 {
    match channel {
        PhysicalChannel::Input(n) | PhysicalChannel::SupplyMonitor(n) => n,
        PhysicalChannel::TemperatureSensor => TEMPERATURE_CHANNEL,
    }
}

/// ADC1 driven one conversion at a time
pub struct Adc {
    regs: pac::adc::Adc,
}

impl Adc {
    /// Calibrate, enable and configure the converter
    ///
    /// The ADC clock (HSI14 in asynchronous mode) must already be running.
    /// Busy-waits on calibration and ADRDY, so call this at boot only.
    pub fn new(regs: pac::adc::Adc, sample_time: SampleTime) -> Self {
        // Calibration requires ADEN = 0
        if regs.cr().read().aden() {
            regs.cr().modify(|w| w.set_addis(true));
            while regs.cr().read().aden() {}
        }
        regs.cr().modify(|w| w.set_adcal(true));
        while regs.cr().read().adcal() {}

        regs.isr().write(|w| w.set_adrdy(true));
        regs.cr().modify(|w| w.set_aden(true));
        while !regs.isr().read().adrdy() {}

        // Single conversion, 12-bit, right aligned, software trigger
        regs.cfgr1().write(|_| {});
        regs.smpr().write_value(Smpr(sample_time as u32));
        regs.chselr().write_value(Chselr(0));

        // Temperature sensor needs its own enable bit
        regs.ccr().modify(|w| w.set_tsen(true));

        regs.ier().write(|w| w.set_eocie(true));

        Self { regs }
    }

    /// Check if the EOC flag is set
    ///
    /// The interrupt line can stay pending after [`Converter::start`]
    /// cleared a stale flag, so the handler checks this before reporting a
    /// completion.
    pub fn conversion_done(&self) -> bool {
        self.regs.isr().read().eoc()
    }

    /// Stop a running conversion so CHSELR may be written
    ///
    /// ADSTP self-clears once the ADC has aborted, within a few ADC clock
    /// cycles, so the wait is bounded. Only the first `configure` of an arm
    /// finds ADSTART set.
    fn stop_conversion(&mut self) {
        if self.regs.cr().read().adstart() {
            self.regs.cr().modify(|w| w.set_adstp(true));
            while self.regs.cr().read().adstp() {}
        }
    }
}

impl Converter for Adc {
    fn configure(&mut self, channel: PhysicalChannel, selected: bool) {
        self.stop_conversion();

        let mask = 1u32 << channel_number(channel);
        let bits = self.regs.chselr().read().0;
        let bits = if selected { bits | mask } else { bits & !mask };
        self.regs.chselr().write_value(Chselr(bits));
    }

    fn start(&mut self) {
        // Drop flags of a superseded conversion
        self.regs.isr().write(|w| {
            w.set_eoc(true);
            w.set_ovr(true);
        });
        self.regs.cr().modify(|w| w.set_adstart(true));
    }

    fn read(&mut self) -> Result<u16, ConversionError> {
        let isr = self.regs.isr().read();
        if isr.ovr() {
            self.regs.isr().write(|w| w.set_ovr(true));
            // Reading DR clears EOC
            let _ = self.regs.dr().read();
            return Err(ConversionError::Overrun);
        }
        if !isr.eoc() {
            return Err(ConversionError::NoData);
        }
        Ok(self.regs.dr().read().data())
    }
}
