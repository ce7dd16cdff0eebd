// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Discrete signals: GPIOD output lines, GPIOE limit inputs and the delay source.
//!
//! The HAL's pins implement the 0.2 `embedded-hal` traits, while the core of the firmware is
//! written against 1.0. `PortDLine` bridges the output side by writing BSRR directly, which is
//! also atomic, so a line can be driven from thread mode and from an ISR without a
//! read-modify-write race on ODR.

use core::convert::Infallible;

use cortex_m::delay::Delay;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use stm32f7xx_hal::{
    gpio::{self, Output, PushPull},
    pac,
};

use super::pins::LimitPins;
use crate::signal::LimitInputs;

/// Push-pull output on port D.
pub struct PortDLine {
    mask: u32,
}

impl PortDLine {
    /// Take ownership of a configured port D pin.
    pub fn new<const N: u8>(_pin: gpio::Pin<'D', N, Output<PushPull>>) -> Self {
        Self { mask: 1 << N }
    }
}

impl ErrorType for PortDLine {
    type Error = Infallible;
}

impl OutputPin for PortDLine {
    #[inline]
    fn set_low(&mut self) -> Result<(), Infallible> {
        let gpiod = unsafe { &*pac::GPIOD::ptr() };
        gpiod.bsrr.write(|w| unsafe { w.bits(self.mask << 16) });
        Ok(())
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Infallible> {
        let gpiod = unsafe { &*pac::GPIOD::ptr() };
        gpiod.bsrr.write(|w| unsafe { w.bits(self.mask) });
        Ok(())
    }
}

/// First EXTI line of the limit inputs (PE8..PE15).
const LIMIT_SHIFT: u32 = 8;
const LIMIT_LINES: u32 = 0xFF << LIMIT_SHIFT;

/// The eight limit switch inputs, PE8..PE15.
pub struct BoardLimits {
    _pins: LimitPins,
}

impl BoardLimits {
    pub fn new(pins: LimitPins) -> Self {
        Self { _pins: pins }
    }
}

impl LimitInputs for BoardLimits {
    fn read_levels(&self) -> u8 {
        let gpioe = unsafe { &*pac::GPIOE::ptr() };
        (gpioe.idr.read().bits() >> LIMIT_SHIFT) as u8
    }
}

/// Route PE8..PE15 to EXTI8..15 and interrupt on both edges.
#[allow(unused_unsafe)]
pub fn listen_limits(syscfg: &pac::SYSCFG, exti: &pac::EXTI) {
    let rcc = unsafe { &*pac::RCC::ptr() };
    rcc.apb2enr.modify(|_, w| w.syscfgen().set_bit());

    // Port E is source 4 in every EXTICR nibble.
    syscfg.exticr3.write(|w| unsafe { w.bits(0x4444) });
    syscfg.exticr4.write(|w| unsafe { w.bits(0x4444) });

    exti.rtsr
        .modify(|r, w| unsafe { w.bits(r.bits() | LIMIT_LINES) });
    exti.ftsr
        .modify(|r, w| unsafe { w.bits(r.bits() | LIMIT_LINES) });
    exti.pr.write(|w| unsafe { w.bits(LIMIT_LINES) });
    exti.imr
        .modify(|r, w| unsafe { w.bits(r.bits() | LIMIT_LINES) });
}

/// Clear pending limit edges. Called from the EXTI handlers.
#[allow(unused_unsafe)]
pub fn clear_limit_pending() {
    let exti = unsafe { &*pac::EXTI::ptr() };
    let pending = exti.pr.read().bits() & LIMIT_LINES;
    exti.pr.write(|w| unsafe { w.bits(pending) });
}

/// SysTick busy-wait delay.
pub struct SysTickDelay {
    delay: Delay,
}

impl SysTickDelay {
    pub fn new(syst: cortex_m::peripheral::SYST, sysclk_hz: u32) -> Self {
        Self {
            delay: Delay::new(syst, sysclk_hz),
        }
    }
}

impl DelayNs for SysTickDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_us(ns.div_ceil(1_000));
    }

    #[inline]
    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}
