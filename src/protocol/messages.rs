// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command byte layout of the host protocol.
//!
//! ```text
//!   7     6 5 4    3 2 1 0
//! +-----+-------+---------+
//! |  W  |  OP   |  AXIS   |
//! +-----+-------+---------+
//! ```
//!
//! `W` set means the host supplies a value in this exchange. `AXIS` 0 is the broadcast selector.
//! Payloads are 4-byte big-endian two's-complement integers.

/// Host-is-writing flag.
pub const WRITE_MASK: u8 = 1 << 7;
/// Operation class field.
pub const OP_MASK: u8 = 0x70;
/// Axis selector field.
pub const AXIS_MASK: u8 = 0x0F;

/// Bytes in one value payload.
pub const VALUE_LEN: usize = 4;

// Operation classes (read form, OR with `WRITE_MASK` for the write form)
pub const CLEAR_COUNTERS: u8 = 0x20;
pub const COUNTERS: u8 = 0x30;
pub const TARGETS: u8 = 0x40;
pub const POS_THRESHOLDS: u8 = 0x50;
pub const LIMITS: u8 = 0x60;
pub const DIRECTIONS: u8 = 0x70;

/// Operation class of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operation {
    /// Zero the position (no payload).
    ClearCounter,
    /// Exchange the calibrated position.
    Counter,
    Target,
    /// Exchange the reached tolerance.
    Threshold,
    /// Limit switches and reached aggregate; the write form acknowledges the interrupt.
    Status,
    /// Set the direction output from the low bit of the payload.
    Direction,
}

impl Operation {
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte & OP_MASK {
            CLEAR_COUNTERS => Some(Operation::ClearCounter),
            COUNTERS => Some(Operation::Counter),
            TARGETS => Some(Operation::Target),
            POS_THRESHOLDS => Some(Operation::Threshold),
            LIMITS => Some(Operation::Status),
            DIRECTIONS => Some(Operation::Direction),
            _ => None,
        }
    }

    /// Operation bits, as they appear in the command byte.
    pub const fn bits(self) -> u8 {
        match self {
            Operation::ClearCounter => CLEAR_COUNTERS,
            Operation::Counter => COUNTERS,
            Operation::Target => TARGETS,
            Operation::Threshold => POS_THRESHOLDS,
            Operation::Status => LIMITS,
            Operation::Direction => DIRECTIONS,
        }
    }
}

/// Command byte whose operation class isn't one we implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownCommand(pub u8);

/// A decoded command byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    pub write: bool,
    pub op: Operation,
    /// Raw axis selector, 0 = broadcast. Not yet checked against the registry.
    pub axis: u8,
}

impl Command {
    pub const fn decode(byte: u8) -> Result<Self, UnknownCommand> {
        match Operation::from_byte(byte) {
            Some(op) => Ok(Self {
                write: byte & WRITE_MASK != 0,
                op,
                axis: byte & AXIS_MASK,
            }),
            None => Err(UnknownCommand(byte)),
        }
    }

    pub const fn read(op: Operation, axis: u8) -> Self {
        Self {
            write: false,
            op,
            axis: axis & AXIS_MASK,
        }
    }

    pub const fn write(op: Operation, axis: u8) -> Self {
        Self {
            write: true,
            op,
            axis: axis & AXIS_MASK,
        }
    }

    pub const fn encode(self) -> u8 {
        let write = if self.write { WRITE_MASK } else { 0 };
        write | self.op.bits() | (self.axis & AXIS_MASK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_position_write_for_axis_one() {
        let cmd = Command::decode(0xB1).unwrap();
        assert!(cmd.write);
        assert_eq!(cmd.op, Operation::Counter);
        assert_eq!(cmd.axis, 1);
    }

    #[test]
    fn decodes_read_forms() {
        assert_eq!(
            Command::decode(0x31),
            Ok(Command::read(Operation::Counter, 1))
        );
        assert_eq!(Command::decode(0x60), Ok(Command::read(Operation::Status, 0)));
        assert_eq!(
            Command::decode(0x23),
            Ok(Command::read(Operation::ClearCounter, 3))
        );
        assert_eq!(
            Command::decode(0xD0),
            Ok(Command::write(Operation::Threshold, 0))
        );
        assert_eq!(
            Command::decode(0xF2),
            Ok(Command::write(Operation::Direction, 2))
        );
    }

    #[test]
    fn axis_field_keeps_bit_three() {
        // 0x38 names axis 8, which is out of range, rather than aliasing broadcast.
        assert_eq!(Command::decode(0x38).map(|c| c.axis), Ok(8));
    }

    #[test]
    fn reserved_operation_classes_are_unknown() {
        for byte in [0x00, 0x05, 0x11, 0x80, 0x9F] {
            assert_eq!(Command::decode(byte), Err(UnknownCommand(byte)));
        }
    }

    #[test]
    fn encode_matches_the_wire_constants() {
        assert_eq!(Command::write(Operation::Counter, 1).encode(), 0xB1);
        assert_eq!(Command::write(Operation::Status, 0).encode(), 0xE0);
        assert_eq!(Command::read(Operation::Target, 4).encode(), 0x44);
    }
}
