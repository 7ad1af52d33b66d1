//! ADC Bridge Firmware
//!
//! Exposes the STM32F042 ADC channels to an I2C master at a fixed slave
//! address. The master writes a one-byte logical channel index and reads
//! back a two-byte little-endian result, 0xFFFF for an unknown channel or a
//! failed conversion.
//!
//! All bus and converter work happens in the `I2C1` and `ADC1` interrupt
//! handlers. The embassy executor only runs the diagnostics task.

#![no_std]
#![no_main]

mod config;

use core::cell::RefCell;

use adc_bridge_core::{Bridge, BridgeStats};
use adc_bridge_hal::i2c::I2cSlaveConfig;
use adc_bridge_hal::BusEvent;
use adc_bridge_hal_stm32f0::{gpio, rcc, Adc, I2cSlave};
use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_stm32::pac;
use embassy_sync::blocking_mutex::CriticalSectionMutex;
use embassy_time::{Duration, Ticker};
use {defmt_rtt as _, panic_probe as _};

use crate::config::{CONFIG, I2C_TIMING, SAMPLE_TIME};

/// Interval between statistics reports
const STATS_INTERVAL_SECS: u64 = 10;

type DeviceBridge = Bridge<I2cSlave, Adc>;

/// Bridge state shared by both interrupt handlers and the diagnostics task
static BRIDGE: CriticalSectionMutex<RefCell<Option<DeviceBridge>>> =
    CriticalSectionMutex::new(RefCell::new(None));

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("ADC bridge firmware starting...");

    let _p = embassy_stm32::init(Default::default());

    if let Err(e) = CONFIG.validate() {
        error!("Invalid bridge configuration: {:?}", e);
        halt();
    }
    info!(
        "Address {=u8:#x}, {} channels, priorities adc={} bus={}",
        CONFIG.own_address,
        CONFIG.channels.len(),
        CONFIG.adc_priority,
        CONFIG.bus_priority
    );

    rcc::enable_bridge_clocks();

    gpio::configure_i2c(gpio::I2C1_SCL, gpio::I2C1_AF);
    gpio::configure_i2c(gpio::I2C1_SDA, gpio::I2C1_AF);
    gpio::configure_analog_inputs(CONFIG.channels);

    let adc = Adc::new(pac::ADC1, SAMPLE_TIME);
    let bus = I2cSlave::new(
        pac::I2C1,
        I2cSlaveConfig {
            address: CONFIG.own_address,
            clock_stretching: true,
        },
        I2C_TIMING,
    );

    let bridge = match Bridge::from_config(bus, adc, &CONFIG) {
        Ok(bridge) => bridge,
        Err(e) => {
            error!("Failed to build bridge: {:?}", e);
            halt();
        }
    };
    info!("Channel map: {}", bridge.channel_map());

    BRIDGE.lock(|cell| {
        cell.replace(Some(bridge));
    });

    // The converter must be able to preempt the bus handler
    interrupt::ADC1.set_priority(nvic_priority(CONFIG.adc_priority));
    interrupt::I2C1.set_priority(nvic_priority(CONFIG.bus_priority));
    // SAFETY: BRIDGE is populated, handlers find Some from here on
    unsafe {
        interrupt::ADC1.enable();
        interrupt::I2C1.enable();
    }

    info!("Listening on I2C1");

    spawner.spawn(diagnostics_task()).unwrap();
}

/// Map a validated 0-3 priority level to the NVIC encoding
fn nvic_priority(level: u8) -> Priority {
    match level {
        0 => Priority::P0,
        1 => Priority::P1,
        2 => Priority::P2,
        _ => Priority::P3,
    }
}

/// Stop here after a configuration error
fn halt() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}

#[interrupt]
fn I2C1() {
    BRIDGE.lock(|cell| {
        let mut slot = cell.borrow_mut();
        let Some(bridge) = slot.as_mut() else {
            return;
        };

        for event in bridge.bus_mut().pending_events() {
            if let BusEvent::ByteReceived(selector) = event {
                trace!("Selector {=u8}", selector);
            }
            bridge.on_bus_event(event);
        }
        bridge.bus_mut().clear_line_errors();
    });
}

#[interrupt]
fn ADC1() {
    BRIDGE.lock(|cell| {
        let mut slot = cell.borrow_mut();
        let Some(bridge) = slot.as_mut() else {
            return;
        };

        if bridge.converter_mut().conversion_done() {
            bridge.on_conversion_complete();
        }
    });
}

/// Diagnostics task - periodically logs bridge counters
#[embassy_executor::task]
async fn diagnostics_task() {
    info!("Diagnostics task started");

    let mut ticker = Ticker::every(Duration::from_secs(STATS_INTERVAL_SECS));
    let mut last = BridgeStats::default();

    loop {
        ticker.next().await;

        let Some((stats, state)) =
            BRIDGE.lock(|cell| cell.borrow().as_ref().map(|b| (b.stats(), b.state())))
        else {
            continue;
        };

        if !state.is_idle() {
            debug!("Transaction in progress: {}", state);
        }

        if stats == last {
            debug!("Idle: {}", stats);
        } else {
            info!("Stats: {}", stats);
            if stats.outstanding() > 1 {
                warn!("{} conversions unaccounted for", stats.outstanding());
            }
        }
        last = stats;
    }
}
