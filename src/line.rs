// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Logical output lines.
//!
//! `OutputLine` wraps any `OutputPin` and remembers whether the line is active-high or active-low,
//! so the rest of the firmware only talks about asserting and releasing a signal. Used for the
//! host interrupt line and the error indicator.

use embedded_hal::digital::OutputPin;

/// Whether a signal is driven (or read) active-high or active-low on the board wiring.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    High,
    Low,
}

impl ActiveLevel {
    /// Map raw input levels (1 = high) to "active" bits (1 = asserted).
    #[inline]
    pub fn normalize(self, levels: u8) -> u8 {
        match self {
            ActiveLevel::High => levels,
            ActiveLevel::Low => !levels,
        }
    }
}

/// Output line that remembers its active level and last driven state.
pub struct OutputLine<PIN: OutputPin> {
    pin: PIN,
    active: ActiveLevel,
    asserted: bool,
}

impl<PIN: OutputPin> OutputLine<PIN> {
    /// Create a line wrapper, initializing it to the released state.
    pub fn new(mut pin: PIN, active: ActiveLevel) -> Self {
        match active {
            ActiveLevel::High => pin.set_low().ok(),
            ActiveLevel::Low => pin.set_high().ok(),
        };
        Self {
            pin,
            active,
            asserted: false,
        }
    }

    pub fn active_high(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::High)
    }

    pub fn active_low(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::Low)
    }

    /// Drive the line logically asserted (true) or released (false).
    pub fn set(&mut self, asserted: bool) {
        match (self.active, asserted) {
            (ActiveLevel::High, true) => self.pin.set_high().ok(),
            (ActiveLevel::High, false) => self.pin.set_low().ok(),
            (ActiveLevel::Low, true) => self.pin.set_low().ok(),
            (ActiveLevel::Low, false) => self.pin.set_high().ok(),
        };
        self.asserted = asserted;
    }

    #[inline]
    pub fn assert(&mut self) {
        self.set(true);
    }

    #[inline]
    pub fn release(&mut self) {
        self.set(false);
    }

    #[inline]
    pub fn is_asserted(&self) -> bool {
        self.asserted
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}
