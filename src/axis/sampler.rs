// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Position sampler.
//!
//! The sampler is the only writer of raw counts and of the reached aggregate. Each `pass()` reads
//! every configured axis from the decoding peripheral, back to back, and folds the result into the
//! aggregate. It never touches the host bus.
//!
//! Typical usage pattern (on the board, `pass()` runs from a periodic timer interrupt):
//!
//! ```ignore
//! loop {
//!     sampler.pass();
//! }
//! ```

use embedded_hal::digital::OutputPin;

use super::{AxisId, AxisRegistry, AxisState, QuadratureSource, Sample};
use crate::signal::{LimitInputs, LimitSignal};

pub struct PositionSampler<'a, Q, D, L, P: OutputPin> {
    source: Q,
    axes: &'a AxisRegistry<D>,
    signal: &'a LimitSignal<L, P>,
}

impl<'a, Q, D, L, P> PositionSampler<'a, Q, D, L, P>
where
    Q: QuadratureSource,
    L: LimitInputs,
    P: OutputPin,
{
    pub fn new(source: Q, axes: &'a AxisRegistry<D>, signal: &'a LimitSignal<L, P>) -> Self {
        Self {
            source,
            axes,
            signal,
        }
    }

    /// Sample one axis. Returns `None` if `id` isn't configured.
    pub fn sample(&mut self, id: AxisId) -> Option<Sample> {
        let axis = self.axes.get(id)?;
        Some(self.sample_axis(axis))
    }

    /// Sample every configured axis once, in id order.
    pub fn pass(&mut self) {
        let axes = self.axes;
        for axis in axes.iter() {
            self.sample_axis(axis);
        }
    }

    fn sample_axis(&mut self, axis: &AxisState<D>) -> Sample {
        let raw = self.source.raw_count(axis.id());
        let sample = axis.sample(raw);

        if self.signal.record_reached(axis.id(), sample.reached) {
            debug!(
                "axis {} reached target at {}",
                axis.id().get(),
                sample.position
            );
        }
        sample
    }

    /// Access the decoding peripheral.
    #[inline]
    pub fn source_mut(&mut self) -> &mut Q {
        &mut self.source
    }

    pub fn free(self) -> Q {
        self.source
    }
}
