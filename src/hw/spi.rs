// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! SPI1 as the host bus, in slave mode.
//!
//! The HAL only drives SPI as a master, so the peripheral is set up through the PAC: mode 3
//! (CPOL = 1, CPHA = 1), hardware NSS, 8-bit frames, RXNE raised at one byte. Every transfer
//! preloads the reply byte and then waits for the host to clock a byte in.

use core::ptr;

use nb::block;
use stm32f7xx_hal::pac;

use crate::protocol::HostBus;

/// RX FIFO size in 8-bit frames.
const RX_FIFO_DEPTH: usize = 4;

/// SPI status faults.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiError {
    /// A byte arrived before the previous one was read.
    Overrun,
    /// NSS misbehaved while the peripheral was enabled.
    ModeFault,
}

pub struct SpiSlave {
    spi: pac::SPI1,
}

impl SpiSlave {
    /// Enable and configure SPI1 as a mode-3 slave. The pins must already be in AF5.
    pub fn spi1(spi: pac::SPI1) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.spi1en().set_bit());

        let slave = Self { spi };
        slave.configure();
        slave
    }

    #[allow(unused_unsafe)]
    fn configure(&self) {
        let spi = &self.spi;
        spi.cr1.modify(|_, w| w.spe().clear_bit());

        spi.cr1.write(|w| {
            w.cpol()
                .set_bit()
                .cpha()
                .set_bit()
                .mstr()
                .clear_bit()
                .ssm()
                .clear_bit()
                .lsbfirst()
                .clear_bit()
        });
        // 8-bit data size, RXNE on a quarter-full FIFO (one byte).
        spi.cr2
            .write(|w| unsafe { w.ds().bits(0b0111).frxth().set_bit() });

        spi.cr1.modify(|_, w| w.spe().set_bit());
    }

    /// Drop everything in both FIFOs and start over from a clean peripheral.
    ///
    /// A reply byte preloaded before a fault stays in the TX FIFO until the peripheral is reset;
    /// without this every later reply would go out one frame late.
    pub fn resync(&mut self) {
        for _ in 0..RX_FIFO_DEPTH {
            if self.spi.sr.read().frlvl().bits() == 0 {
                break;
            }
            let _ = self.read_dr();
        }
        let _ = self.spi.sr.read();

        self.spi.cr1.modify(|_, w| w.spe().clear_bit());

        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2rstr.modify(|_, w| w.spi1rst().set_bit());
        rcc.apb2rstr.modify(|_, w| w.spi1rst().clear_bit());

        self.configure();
        debug!("spi1 resynchronized");
    }

    fn check(&self) -> Result<(), SpiError> {
        let sr = self.spi.sr.read();
        if sr.ovr().bit_is_set() {
            // OVR clears on a DR read followed by an SR read.
            let _ = self.read_dr();
            let _ = self.spi.sr.read();
            return Err(SpiError::Overrun);
        }
        if sr.modf().bit_is_set() {
            // MODF clears on an SR read followed by a CR1 write.
            self.spi.cr1.modify(|_, w| w.spe().set_bit());
            return Err(SpiError::ModeFault);
        }
        Ok(())
    }

    /// Queue one byte for the next frame the host clocks.
    pub fn send(&mut self, byte: u8) -> nb::Result<(), SpiError> {
        self.check()?;
        if self.spi.sr.read().txe().bit_is_clear() {
            return Err(nb::Error::WouldBlock);
        }
        // DR must be accessed as a byte or the FIFO packs two frames.
        unsafe { ptr::write_volatile(&self.spi.dr as *const _ as *mut u8, byte) };
        Ok(())
    }

    /// Take one received byte.
    pub fn read(&mut self) -> nb::Result<u8, SpiError> {
        self.check()?;
        if self.spi.sr.read().rxne().bit_is_clear() {
            return Err(nb::Error::WouldBlock);
        }
        Ok(self.read_dr())
    }

    #[inline]
    fn read_dr(&self) -> u8 {
        unsafe { ptr::read_volatile(&self.spi.dr as *const _ as *const u8) }
    }

    pub fn free(self) -> pac::SPI1 {
        self.spi
    }
}

impl HostBus for SpiSlave {
    type Error = SpiError;

    fn transfer_byte(&mut self, byte: u8) -> Result<u8, SpiError> {
        block!(self.send(byte))?;
        block!(self.read())
    }

    fn recover(&mut self) {
        self.resync();
    }
}
