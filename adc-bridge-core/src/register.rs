//! Shared register state
//!
//! The three fields the bus handler and the conversion handler both touch.
//! There is no lock around them. Each field has exactly one writer, and the
//! conversion handler runs at a higher interrupt priority than the bus
//! handler, so a transmit can never interleave with a half-written result.
//!
//! | Field      | Written by                                   |
//! |------------|----------------------------------------------|
//! | `selector` | receive-byte handler                         |
//! | `result`   | completion handler (receive handler: sentinel) |
//! | `cursor`   | transmit handler advances; completion resets to 0; receive handler sets `NotReady` or 0 |

/// Result value returned for invalid selections and failed conversions
pub const SENTINEL: u16 = 0xFFFF;

/// Number of bytes in a transmitted result
pub const RESULT_LEN: u8 = 2;

/// Selector value before any write transaction
const NO_SELECTION: u8 = 0xFF;

/// Position of the next result byte to transmit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmitCursor {
    /// Conversion requested, result not available yet; stretch the bus
    NotReady,
    /// Index of the next byte; values >= [`RESULT_LEN`] mean drained
    At(u8),
}

impl TransmitCursor {
    /// Check if both bytes have gone out
    pub fn is_drained(&self) -> bool {
        matches!(self, TransmitCursor::At(n) if *n >= RESULT_LEN)
    }
}

/// The bridge's register file
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterFile {
    selector: u8,
    result: u16,
    cursor: TransmitCursor,
    /// The first result byte is sitting in the bus staging register
    primed: bool,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Power-on state: reads return the sentinel
    pub const fn new() -> Self {
        Self {
            selector: NO_SELECTION,
            result: SENTINEL,
            cursor: TransmitCursor::At(0),
            primed: false,
        }
    }

    /// Last selector written by the master
    pub fn selector(&self) -> u8 {
        self.selector
    }

    /// Current cursor
    pub fn cursor(&self) -> TransmitCursor {
        self.cursor
    }

    /// Result value, or `None` while a conversion is pending
    pub fn result(&self) -> Option<u16> {
        match self.cursor {
            TransmitCursor::NotReady => None,
            TransmitCursor::At(_) => Some(self.result),
        }
    }

    /// Receive handler: store the requested channel
    pub fn latch_selector(&mut self, selector: u8) {
        self.selector = selector;
    }

    /// Receive handler: a conversion was armed, withhold transmission
    pub fn await_conversion(&mut self) {
        self.cursor = TransmitCursor::NotReady;
        self.primed = false;
    }

    /// Receive handler (invalid selection) or completion handler (failed
    /// conversion): answer with the sentinel
    pub fn load_sentinel(&mut self) {
        self.load_result(SENTINEL);
    }

    /// Completion handler: publish a fresh result
    pub fn load_result(&mut self, value: u16) {
        self.result = value;
        self.cursor = TransmitCursor::At(0);
        self.primed = false;
    }

    /// Take the byte under the cursor and advance
    ///
    /// Returns `None` while not ready or once both bytes went out.
    pub fn next_byte(&mut self) -> Option<u8> {
        match self.cursor {
            TransmitCursor::At(n) if n < RESULT_LEN => {
                let byte = self.result.to_le_bytes()[n as usize];
                self.cursor = TransmitCursor::At(n + 1);
                Some(byte)
            }
            _ => None,
        }
    }

    /// Completion handler: the first byte was pushed ahead of the read
    pub fn mark_primed(&mut self) {
        self.primed = true;
    }

    /// Consume the primed flag
    ///
    /// Returns true if the staging register holds the current result's
    /// first byte.
    pub fn take_primed(&mut self) -> bool {
        core::mem::take(&mut self.primed)
    }
}
