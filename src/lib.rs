// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Encoder Node Firmware
//!
//! Motion-feedback firmware for a machine controller: tracks the absolute position of several
//! quadrature-encoded axes and serves them to a host controller over SPI, together with
//! hard-limit and target-reached status and an interrupt line for host attention. Written in Rust,
//! targeting an STM32F777 MCU.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`axis`] | Shared per-axis state, the axis registry and the position sampler |
//! | [`protocol`] | Command byte decoding and the command engine |
//! | [`signal`] | Limit switches, reached aggregate and the host interrupt line |
//! | [`line`] | Active-level aware output lines |
//! | [`config`] | Static configuration |
//! | `hw` | MCU-level wrappers (encoder timers, SPI slave, GPIO lines); `board` feature only |
//!
//! Two loops share the axis state: the sampler (writes raw counts, reads targets) and the command
//! engine (reads positions, writes offsets/targets/thresholds). Each axis has its own lock and no
//! lock is ever held across a bus transfer.
//!
//! ## Getting Started
//!
//! Run the host test suite:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features board --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every other module.
mod fmt;

pub mod axis;
pub mod config;
pub mod line;
pub mod protocol;
pub mod signal;

#[cfg(feature = "board")]
pub mod hw;

#[cfg(test)]
use critical_section as _;

pub use axis::{AxisId, AxisRegistry, AxisState, PositionSampler, QuadratureSource};
pub use config::EngineConfig;
pub use line::{ActiveLevel, OutputLine};
pub use protocol::{CommandEngine, HostBus, Outcome};
pub use signal::{LimitInputs, LimitSignal, StatusRecord};
