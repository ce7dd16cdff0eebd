// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! MCU-level wrappers for the STM32F777 board.

pub mod encoder;
pub mod lines;
pub mod pins;
pub mod spi;
pub mod tick;

pub use encoder::EncoderBank;
pub use lines::{BoardLimits, PortDLine, SysTickDelay};
pub use pins::BoardPins;
pub use spi::{SpiError, SpiSlave};
pub use tick::SampleTick;

use crate::axis::{AxisId, AxisRegistry};

/// Sampler tick rate.
pub const SAMPLE_RATE_HZ: u32 = 10_000;

/// Axes wired on this board: X, Y and Z with direction lines, W without.
pub fn board_axes(dir: pins::DirectionPins) -> AxisRegistry<PortDLine> {
    AxisRegistry::new()
        .with_axis(AxisId::X, Some(PortDLine::new(dir.x)))
        .with_axis(AxisId::Y, Some(PortDLine::new(dir.y)))
        .with_axis(AxisId::Z, Some(PortDLine::new(dir.z)))
        .with_axis(AxisId::W, None)
}
