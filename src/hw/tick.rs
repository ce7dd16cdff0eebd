// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! TIM6 as the periodic sampler tick.

use stm32f7xx_hal::pac;

pub struct SampleTick {
    tim: pac::TIM6,
}

impl SampleTick {
    /// Enable TIM6 and raise its update interrupt `rate_hz` times a second. `timer_hz` is the
    /// APB1 timer clock.
    #[allow(unused_unsafe)]
    pub fn tim6(tim: pac::TIM6, timer_hz: u32, rate_hz: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim6en().set_bit());

        tim.cr1.modify(|_, w| w.cen().clear_bit());

        // Count at 1 MHz.
        let psc = (timer_hz / 1_000_000).saturating_sub(1);
        let arr = (1_000_000 / rate_hz).saturating_sub(1);
        tim.psc.write(|w| unsafe { w.bits(psc) });
        tim.arr.write(|w| unsafe { w.bits(arr) });

        // Latch PSC/ARR now, then drop the update flag that UG set.
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.modify(|_, w| w.uif().clear_bit());

        tim.dier.modify(|_, w| w.uie().set_bit());
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim }
    }

    /// Acknowledge the update interrupt. Called from the TIM6 handler.
    #[inline]
    pub fn clear_pending() {
        let tim = unsafe { &*pac::TIM6::ptr() };
        tim.sr.modify(|_, w| w.uif().clear_bit());
    }

    pub fn free(self) -> pac::TIM6 {
        self.tim
    }
}
