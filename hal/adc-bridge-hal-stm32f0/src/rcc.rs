//! Peripheral clock gating
//!
//! `embassy_stm32::init` sets up the system clock tree but leaves the
//! peripherals the bridge drives through the PAC gated off.

use embassy_stm32::pac;

/// Enable GPIOA/GPIOB, I2C1 and ADC1 clocks
///
/// Also starts HSI14, the dedicated asynchronous ADC clock, and waits for it
/// to settle.
pub fn enable_bridge_clocks() {
    let rcc = pac::RCC;

    rcc.ahbenr().modify(|w| {
        w.set_gpioaen(true);
        w.set_gpioben(true);
    });
    rcc.apb1enr().modify(|w| w.set_i2c1en(true));
    rcc.apb2enr().modify(|w| w.set_adcen(true));

    rcc.cr2().modify(|w| w.set_hsi14on(true));
    while !rcc.cr2().read().hsi14rdy() {}
}
