//! Board configuration
//!
//! Generated at build time from `bridge.toml`. The build script already
//! rejects invalid files; `main` validates [`CONFIG`] again at boot through
//! `BridgeConfig::validate` before touching any peripheral.

use adc_bridge_core::BridgeConfig;
use adc_bridge_hal::PhysicalChannel;
use adc_bridge_hal_stm32f0::SampleTime;

include!(concat!(env!("OUT_DIR"), "/bridge_config.rs"));
