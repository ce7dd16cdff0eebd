// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Byte-level access to the host bus.
//!
//! The node is the bus slave: every byte moves when the host clocks it, and each transfer is
//! full-duplex, so sending a reply byte also receives one.

/// Byte sent while the node has nothing to say (e.g. while receiving a command byte).
pub const FILLER: u8 = 0x00;

pub trait HostBus {
    type Error;

    /// Full-duplex transfer of one byte. Blocks until the host clocks it.
    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error>;

    /// Wait for the next command byte.
    #[inline]
    fn read_command(&mut self) -> Result<u8, Self::Error> {
        self.transfer_byte(FILLER)
    }

    /// Return the bus to a frame boundary after a fault or an unrecognized command, dropping
    /// anything queued in either direction. Buses without internal buffering have nothing to do.
    fn recover(&mut self) {}

    /// Send bytes, ignoring what the host sends back.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for &b in bytes {
            self.transfer_byte(b)?;
        }
        Ok(())
    }

    /// Transfer a byte buffer in-place.
    fn transfer_in_place(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        for b in buf.iter_mut() {
            *b = self.transfer_byte(*b)?;
        }
        Ok(())
    }

    /// Send `value` big-endian and return the value the host sent in the same 4 bytes.
    fn exchange(&mut self, value: i32) -> Result<i32, Self::Error> {
        let mut buf = value.to_be_bytes();
        self.transfer_in_place(&mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }
}
