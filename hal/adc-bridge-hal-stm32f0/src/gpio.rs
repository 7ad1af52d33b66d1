//! GPIO configuration for STM32F0
//!
//! Pin setup for the two peripherals the bridge uses: analog mode for the
//! converter inputs and open-drain alternate function for I2C.

use adc_bridge_hal::PhysicalChannel;
use embassy_stm32::pac;
use embassy_stm32::pac::gpio::vals::{Moder, Ot, Pupdr};

/// GPIO port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    F,
}

/// A single GPIO pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId {
    pub port: Port,
    pub pin: u8,
}

impl PinId {
    pub const fn new(port: Port, pin: u8) -> Self {
        Self { port, pin }
    }
}

/// I2C1 SCL on the reference board (PB6)
pub const I2C1_SCL: PinId = PinId::new(Port::B, 6);

/// I2C1 SDA on the reference board (PB7)
pub const I2C1_SDA: PinId = PinId::new(Port::B, 7);

/// Alternate function number of I2C1 on PB6/PB7
pub const I2C1_AF: u8 = 1;

/// Pin wired to a converter input channel
///
/// ADC_IN0-7 are PA0-PA7, ADC_IN8-9 are PB0-PB1. Higher channels are
/// internal.
pub fn adc_input_pin(channel: u8) -> Option<PinId> {
    match channel {
        0..=7 => Some(PinId::new(Port::A, channel)),
        8 | 9 => Some(PinId::new(Port::B, channel - 8)),
        _ => None,
    }
}

fn regs(port: Port) -> pac::gpio::Gpio {
    match port {
        Port::A => pac::GPIOA,
        Port::B => pac::GPIOB,
        Port::F => pac::GPIOF,
    }
}

/// Put a pin in analog mode without pulls
pub fn configure_analog(pin: PinId) {
    let r = regs(pin.port);
    let n = pin.pin as usize;
    r.pupdr().modify(|w| w.set_pupdr(n, Pupdr::FLOATING));
    r.moder().modify(|w| w.set_moder(n, Moder::ANALOG));
}

/// Put the pin behind every externally wired channel in analog mode
///
/// Internal channels have no pin and are skipped.
pub fn configure_analog_inputs<'a>(channels: impl IntoIterator<Item = &'a PhysicalChannel>) {
    channels
        .into_iter()
        .filter_map(|channel| channel.pin_channel())
        .filter_map(adc_input_pin)
        .for_each(configure_analog);
}

/// Put a pin in open-drain alternate-function mode for I2C
///
/// External pull-ups are expected on the bus.
pub fn configure_i2c(pin: PinId, af: u8) {
    let r = regs(pin.port);
    let n = pin.pin as usize;
    r.afr(n / 8).modify(|w| w.set_afr(n % 8, af));
    r.otyper().modify(|w| w.set_ot(n, Ot::OPENDRAIN));
    r.pupdr().modify(|w| w.set_pupdr(n, Pupdr::FLOATING));
    r.moder().modify(|w| w.set_moder(n, Moder::ALTERNATE));
}
