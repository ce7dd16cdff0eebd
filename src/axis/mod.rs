// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Axis State
//!
//! Per-axis position bookkeeping shared between the position sampler and the command engine.
//!
//! ## Modules
//!
//! - [`state`] - Lock-guarded record for one axis (count, offset, target, tolerance, direction).
//! - [`registry`] - Fixed-capacity table of axes indexed by axis id.
//! - [`sampler`] - Pulls raw counts from the decoder and maintains the reached aggregate.

pub mod registry;
pub mod sampler;
pub mod state;

pub use registry::{AxisRegistry, Lookup};
pub use sampler::PositionSampler;
pub use state::{within_tolerance, AxisSnapshot, AxisState, Sample};

use crate::config::MAX_AXES;

/// Identifier of a configured axis, always in `1..MAX_AXES`.
///
/// Id 0 is the broadcast selector and never names an axis, so it can't be represented here.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisId(u8);

impl AxisId {
    pub const X: AxisId = AxisId(1);
    pub const Y: AxisId = AxisId(2);
    pub const Z: AxisId = AxisId(3);
    pub const W: AxisId = AxisId(4);

    /// Validate a raw axis id.
    pub const fn new(id: u8) -> Option<Self> {
        if id >= 1 && (id as usize) < MAX_AXES {
            Some(Self(id))
        } else {
            None
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Registry slot of this axis.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Bit of this axis in the reached aggregate.
    #[inline]
    pub const fn mask(self) -> u8 {
        1 << self.0
    }
}

/// The quadrature decoding peripheral.
///
/// Implementations return a free-running count that wraps with two's-complement arithmetic. Reads
/// must be cheap and must never block.
pub trait QuadratureSource {
    fn raw_count(&mut self, axis: AxisId) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_ids_exclude_broadcast_and_out_of_range() {
        assert_eq!(AxisId::new(0), None);
        assert_eq!(AxisId::new(1), Some(AxisId::X));
        assert_eq!(AxisId::new(7).map(AxisId::get), Some(7));
        assert_eq!(AxisId::new(8), None);
        assert_eq!(AxisId::new(15), None);
    }

    #[test]
    fn axis_mask_is_one_bit_per_id() {
        assert_eq!(AxisId::X.mask(), 0b0000_0010);
        assert_eq!(AxisId::Y.mask(), 0b0000_0100);
        assert_eq!(AxisId::W.mask(), 0b0001_0000);
    }
}
