// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Static node configuration.
//!
//! Everything here is fixed at build time. Board wiring lives in `hw::pins`.

/// Number of registry slots. Slot 0 is never an axis, so ids `1..MAX_AXES` are usable and every
/// axis maps to one bit of the 8-bit reached aggregate.
pub const MAX_AXES: usize = 8;

/// Axis selector meaning "all configured axes".
pub const BROADCAST: u8 = 0;

/// Pause after an unrecognized command before waiting for the next one.
pub const DEFAULT_RESYNC_DELAY_US: u32 = 10;

/// Command engine tunables.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineConfig {
    /// Delay inserted after an unknown command, giving the host a chance to finish clocking a
    /// transaction the node lost track of. Zero disables it.
    pub resync_delay_us: u32,
}

impl EngineConfig {
    pub const fn new() -> Self {
        Self {
            resync_delay_us: DEFAULT_RESYNC_DELAY_US,
        }
    }

    /// Override the post-error resynchronization delay.
    pub const fn with_resync_delay_us(mut self, us: u32) -> Self {
        self.resync_delay_us = us;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
