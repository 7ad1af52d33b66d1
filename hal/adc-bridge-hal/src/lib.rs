//! ADC Bridge Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the bridge logic is
//! written against. Chip-specific HALs (STM32F0 today) implement them, and
//! the host simulation in `adc-bridge-core` implements them for tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  adc-bridge-firmware (interrupt wiring) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  adc-bridge-core (protocol + registers) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  adc-bridge-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!         ┌───────────────────────┐
//!         │ adc-bridge-hal-stm32f0│
//!         └───────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::SlaveBus`] - Two-wire slave output path and condition flags
//! - [`adc::Converter`] - Single-channel analog converter

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use adc::{ConversionError, Converter, PhysicalChannel};
pub use i2c::{BusEvent, Condition, Direction, SlaveBus};
