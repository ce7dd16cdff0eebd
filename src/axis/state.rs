// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Lock-guarded state of a single axis.
//!
//! The sampler owns `raw_count`; everything the host writes goes through `offset`, `target`,
//! `pos_threshold` or the direction line. The calibrated position is always derived as
//! `raw_count + offset` inside the lock, so readers never see a count from one update paired with
//! an offset from another.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use embedded_hal::digital::{OutputPin, PinState};

use super::AxisId;

/// Copy of every field of an axis, taken under one lock acquisition.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisSnapshot {
    pub raw_count: i32,
    pub offset: i32,
    pub position: i32,
    /// Count change seen by the most recent sample.
    pub delta: i32,
    pub target: i32,
    pub pos_threshold: i32,
    pub reached: bool,
    pub has_direction: bool,
    /// Last level requested for the direction line.
    pub direction_high: bool,
}

/// Result of feeding one raw count into an axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    pub position: i32,
    pub delta: i32,
    pub reached: bool,
}

/// `true` when `position` is within `threshold` counts of `target`.
///
/// The comparison is strict (`|target - position| < threshold`), except that a threshold of 0
/// means an exact match is required. Distances are taken modulo 2^32, matching the wrapped count
/// domain.
pub fn within_tolerance(target: i32, position: i32, threshold: i32) -> bool {
    let distance = target.wrapping_sub(position).unsigned_abs();
    if threshold <= 0 {
        distance == 0
    } else {
        distance < threshold.unsigned_abs()
    }
}

struct Record {
    raw_count: i32,
    offset: i32,
    delta: i32,
    target: i32,
    pos_threshold: i32,
    reached: bool,
    direction_high: bool,
}

impl Record {
    #[inline]
    fn position(&self) -> i32 {
        self.raw_count.wrapping_add(self.offset)
    }

    fn snapshot(&self, has_direction: bool) -> AxisSnapshot {
        AxisSnapshot {
            raw_count: self.raw_count,
            offset: self.offset,
            position: self.position(),
            delta: self.delta,
            target: self.target,
            pos_threshold: self.pos_threshold,
            reached: self.reached,
            has_direction,
            direction_high: self.direction_high,
        }
    }
}

/// One physical axis.
pub struct AxisState<D> {
    id: AxisId,
    record: Mutex<CriticalSectionRawMutex, RefCell<Record>>,
    // The record lock only ever covers field copies; the pin has its own.
    direction: Option<Mutex<CriticalSectionRawMutex, RefCell<D>>>,
}

impl<D> AxisState<D> {
    /// Create an axis at position 0, target 0, exact-match tolerance.
    pub fn new(id: AxisId, direction: Option<D>) -> Self {
        Self {
            id,
            record: Mutex::new(RefCell::new(Record {
                raw_count: 0,
                offset: 0,
                delta: 0,
                target: 0,
                pos_threshold: 0,
                reached: false,
                direction_high: false,
            })),
            direction: direction.map(|pin| Mutex::new(RefCell::new(pin))),
        }
    }

    #[inline]
    pub fn id(&self) -> AxisId {
        self.id
    }

    /// Run `f` with exclusive access to the record. The lock is released when `f` returns.
    #[inline]
    fn with<R>(&self, f: impl FnOnce(&mut Record) -> R) -> R {
        self.record.lock(|cell| f(&mut *cell.borrow_mut()))
    }

    /// Store a fresh raw count from the decoder and recompute `reached`.
    pub fn sample(&self, raw_count: i32) -> Sample {
        self.with(|r| {
            // Two's complement keeps the delta right across the i32 wrap.
            r.delta = raw_count.wrapping_sub(r.raw_count);
            r.raw_count = raw_count;
            let position = r.position();
            r.reached = within_tolerance(r.target, position, r.pos_threshold);
            Sample {
                position,
                delta: r.delta,
                reached: r.reached,
            }
        })
    }

    pub fn position(&self) -> i32 {
        self.with(|r| r.position())
    }

    /// Make the current position read as `value` by moving the calibration offset. The decoder's
    /// free-running count is left alone.
    pub fn set_position(&self, value: i32) {
        self.with(|r| {
            r.offset = r.offset.wrapping_add(value.wrapping_sub(r.position()));
        });
    }

    pub fn target(&self) -> i32 {
        self.with(|r| r.target)
    }

    pub fn set_target(&self, value: i32) {
        self.with(|r| r.target = value);
    }

    pub fn threshold(&self) -> i32 {
        self.with(|r| r.pos_threshold)
    }

    /// Set the reached tolerance. Negative values are clamped to 0 (exact match).
    pub fn set_threshold(&self, value: i32) {
        self.with(|r| r.pos_threshold = value.max(0));
    }

    /// `reached` as of the last sample.
    pub fn reached(&self) -> bool {
        self.with(|r| r.reached)
    }

    #[inline]
    pub fn has_direction(&self) -> bool {
        self.direction.is_some()
    }

    pub fn snapshot(&self) -> AxisSnapshot {
        let has_direction = self.has_direction();
        self.with(|r| r.snapshot(has_direction))
    }
}

impl<D: OutputPin> AxisState<D> {
    /// Drive the direction line high (`true`) or low. Returns `false` if the axis has no
    /// direction line, in which case nothing happens.
    ///
    /// The requested level is stored under the record lock; the pin is driven after it is
    /// released.
    pub fn set_direction(&self, high: bool) -> bool {
        let Some(line) = self.direction.as_ref() else {
            return false;
        };
        self.with(|r| r.direction_high = high);
        line.lock(|pin| pin.borrow_mut().set_state(PinState::from(high)).ok());
        true
    }
}
