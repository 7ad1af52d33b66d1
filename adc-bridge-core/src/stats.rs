//! Bridge activity counters

/// Counters updated by the interrupt handlers
///
/// All counters wrap on overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BridgeStats {
    /// Conversions armed by a valid selection
    pub armed: u32,
    /// Conversions that delivered a value
    pub completed: u32,
    /// Conversions the converter reported as failed
    pub failed: u32,
    /// Selections outside the channel map
    pub invalid: u32,
    /// Pending conversions replaced by a newer selection
    pub superseded: u32,
    /// Completions with nothing in flight
    pub spurious: u32,
}

impl BridgeStats {
    /// Conversions still unaccounted for (0 or 1 in steady state)
    pub fn outstanding(&self) -> u32 {
        self.armed
            .wrapping_sub(self.completed)
            .wrapping_sub(self.failed)
            .wrapping_sub(self.superseded)
    }
}

pub(crate) fn bump(counter: &mut u32) {
    *counter = counter.wrapping_add(1);
}
