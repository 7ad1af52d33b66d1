//! STM32F0-specific HAL for the ADC bridge firmware
//!
//! Register-level implementations of the `adc-bridge-hal` traits for the
//! STM32F0 family, built on the peripheral access crate re-exported by
//! embassy-stm32 (`embassy_stm32::pac`). Supported chips:
//!
//! - STM32F042F6 / STM32F042K6
//!
//! # Features
//!
//! - `stm32f042f6`, `stm32f042k6` - Select the chip
//! - `defmt` - Enable debug formatting support
//!
//! # Usage
//!
//! Call `embassy_stm32::init` first for clocks and
//! [`rcc::enable_bridge_clocks`] for the peripheral gates, then build [`i2c::I2cSlave`]
//! and [`adc::Adc`]. Both are driven from interrupt handlers only: the
//! firmware reads [`i2c::I2cSlave::pending_events`] in the I2C interrupt and
//! checks [`adc::Adc::conversion_done`] in the ADC interrupt.

#![no_std]

pub mod adc;
pub mod gpio;
pub mod i2c;
pub mod rcc;

pub use adc::{Adc, SampleTime};
pub use i2c::I2cSlave;
