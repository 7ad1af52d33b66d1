//! Property tests over whole bus transactions

use adc_bridge_hal::{BusEvent, PhysicalChannel};
use proptest::prelude::*;

use crate::channel::DEFAULT_CHANNELS;
use crate::sim::Harness;

const N: u8 = DEFAULT_CHANNELS.len() as u8;

fn physical(logical: u8) -> PhysicalChannel {
    DEFAULT_CHANNELS[logical as usize]
}

proptest! {
    #[test]
    fn valid_channel_reads_its_code(channel in 0..N, code in any::<u16>()) {
        let mut h = Harness::new();
        h.set_code(physical(channel), code);

        h.write(channel);
        prop_assert!(h.convert());
        prop_assert_eq!(h.read(), Some(code.to_le_bytes()));
    }

    #[test]
    fn invalid_channel_reads_sentinel(channel in N..=u8::MAX) {
        let mut h = Harness::new();
        h.write(channel);
        prop_assert!(!h.convert());
        prop_assert_eq!(h.read(), Some([0xFF, 0xFF]));
    }

    #[test]
    fn early_read_blocks_then_yields_code(
        channel in 0..N,
        code in any::<u16>(),
        early_clocks in 1usize..5,
    ) {
        let mut h = Harness::new();
        h.set_code(physical(channel), code);

        h.write(channel);
        h.begin_read();
        for _ in 0..early_clocks {
            prop_assert_eq!(h.clock_byte(), None);
        }
        prop_assert!(h.convert());

        let [low, high] = code.to_le_bytes();
        prop_assert_eq!(h.clock_byte(), Some(low));
        prop_assert_eq!(h.clock_byte(), Some(high));
        h.stop();
    }

    #[test]
    fn latest_selection_wins(
        first in 0..N,
        second in 0..N,
        first_code in any::<u16>(),
        second_code in any::<u16>(),
    ) {
        prop_assume!(first != second);
        let mut h = Harness::new();
        h.set_code(physical(first), first_code);
        h.set_code(physical(second), second_code);

        h.write(first);
        h.write(second);
        prop_assert!(h.convert());
        prop_assert_eq!(h.read(), Some(second_code.to_le_bytes()));
    }

    #[test]
    fn exactly_one_channel_enabled_per_start(selectors in prop::collection::vec(any::<u8>(), 1..16)) {
        let mut h = Harness::new();
        for selector in selectors {
            h.write(selector);
            // SimConverter::start asserts a single enabled channel
            prop_assert!(h.bridge.converter_mut().selected().len() <= 1);
        }
    }

    #[test]
    fn any_sequence_never_leaks_stale_bytes(
        steps in prop::collection::vec((any::<u8>(), any::<bool>(), any::<bool>()), 1..12),
    ) {
        let mut h = Harness::new();
        for (selector, complete, read) in steps {
            h.write(selector);
            let expected = if selector < N {
                if !complete {
                    continue;
                }
                prop_assert!(h.convert());
                h.bridge.converter_mut().code(physical(selector))
            } else {
                0xFFFF
            };
            // Unread results stay staged and must not bleed into later reads
            if read {
                prop_assert_eq!(h.read(), Some(expected.to_le_bytes()));
            }
        }
    }

    #[test]
    fn partial_reads_never_leak_stale_bytes(
        steps in prop::collection::vec((0..N, any::<bool>()), 1..12),
    ) {
        let mut h = Harness::new();
        for (selector, low_only) in steps {
            h.write(selector);
            prop_assert!(h.convert());
            let code = h.bridge.converter_mut().code(physical(selector));
            let [low, high] = code.to_le_bytes();

            h.begin_read();
            prop_assert_eq!(h.clock_byte(), Some(low));
            if low_only {
                // The peripheral requests the high byte, then the master stops
                h.bridge.on_bus_event(BusEvent::ReadyToTransmit);
                prop_assert_eq!(h.bridge.bus().staged(), Some(high));
            } else {
                prop_assert_eq!(h.clock_byte(), Some(high));
            }
            h.stop();
        }
    }
}
