// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host attention signalling: limit switches, the reached aggregate and the interrupt line.
//!
//! The interrupt line is a level, not a queue. Two producers can assert it (the sampler, when an
//! axis enters its target window, and the limit-switch edge handler) and only the host clears it,
//! by acknowledging through the status command. Any number of assertions between two
//! acknowledges collapse into one pending interrupt.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU8, Ordering};

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use embedded_hal::digital::OutputPin;

use crate::axis::AxisId;
use crate::line::{ActiveLevel, OutputLine};

/// Hard-limit switch inputs.
pub trait LimitInputs {
    /// Raw levels of up to eight limit inputs, one bit per input (1 = electrically high).
    fn read_levels(&self) -> u8;
}

/// Status record returned by the status command.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusRecord {
    /// Active limit switches, one bit per input.
    pub limits: u8,
    /// Reached aggregate, bit `n` for axis `n`.
    pub reached: u8,
}

impl StatusRecord {
    pub const LEN: usize = 4;

    /// Wire form: `{limits, reached, 0, 0}`.
    #[inline]
    pub fn to_bytes(self) -> [u8; Self::LEN] {
        [self.limits, self.reached, 0, 0]
    }
}

pub struct LimitSignal<L, P: OutputPin> {
    inputs: L,
    wiring: ActiveLevel,
    reached: AtomicU8,
    irq: Mutex<CriticalSectionRawMutex, RefCell<OutputLine<P>>>,
}

impl<L, P> LimitSignal<L, P>
where
    L: LimitInputs,
    P: OutputPin,
{
    /// `wiring` is the active level of the limit switches; `irq` is the line to the host.
    pub fn new(inputs: L, wiring: ActiveLevel, irq: OutputLine<P>) -> Self {
        Self {
            inputs,
            wiring,
            reached: AtomicU8::new(0),
            irq: Mutex::new(RefCell::new(irq)),
        }
    }

    /// Read the limit inputs now. Bit set = switch active.
    pub fn read_limit_bitmap(&self) -> u8 {
        self.wiring.normalize(self.inputs.read_levels())
    }

    /// Current reached aggregate.
    #[inline]
    pub fn reached(&self) -> u8 {
        self.reached.load(Ordering::Relaxed)
    }

    pub fn status(&self) -> StatusRecord {
        StatusRecord {
            limits: self.read_limit_bitmap(),
            reached: self.reached(),
        }
    }

    /// Assert the interrupt line. Returns `true` if it was not already pending.
    pub fn raise(&self) -> bool {
        let raised = self.irq.lock(|line| {
            let mut line = line.borrow_mut();
            if line.is_asserted() {
                false
            } else {
                line.assert();
                true
            }
        });
        if raised {
            debug!("host interrupt raised");
        }
        raised
    }

    /// Limit switch edge handler.
    pub fn on_limit_edge(&self) {
        self.raise();
    }

    /// Update the aggregate bit of `axis`. Called by the sampler only.
    ///
    /// The interrupt fires when the aggregate grows numerically, i.e. when an axis enters its
    /// target window. Returns `true` in that case.
    pub fn record_reached(&self, axis: AxisId, reached: bool) -> bool {
        let old = self.reached.load(Ordering::Relaxed);
        let new = if reached {
            old | axis.mask()
        } else {
            old & !axis.mask()
        };
        if new == old {
            return false;
        }
        self.reached.store(new, Ordering::Relaxed);

        if new > old {
            self.raise();
            true
        } else {
            false
        }
    }

    /// Release the interrupt line. Returns `true` if an interrupt was pending.
    pub fn acknowledge(&self) -> bool {
        let was_pending = self.irq.lock(|line| {
            let mut line = line.borrow_mut();
            let was = line.is_asserted();
            line.release();
            was
        });
        if was_pending {
            debug!("host interrupt acknowledged");
        }
        was_pending
    }

    pub fn is_pending(&self) -> bool {
        self.irq.lock(|line| line.borrow().is_asserted())
    }
}
