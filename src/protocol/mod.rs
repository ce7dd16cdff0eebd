// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Host Protocol
//!
//! - [`messages`] - Command byte layout and decoding.
//! - [`bus`] - Byte-level host bus abstraction.
//! - [`engine`] - Command dispatch against the axis registry.

pub mod bus;
pub mod engine;
pub mod messages;

pub use bus::HostBus;
pub use engine::{CommandEngine, Outcome};
pub use messages::{Command, Operation, UnknownCommand};
