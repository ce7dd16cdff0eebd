// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 encoder node.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, gpiod, gpioe, gpioh, Alternate, Input, Output, PullUp, PushPull},
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD, dp.GPIOE, dp.GPIOH);
/// ```
pub struct BoardPins {
    pub spi1: Spi1Pins,
    pub encoder: EncoderPins,
    pub dir: DirectionPins,
    pub irq: gpiod::PD4<Output<PushPull>>,
    pub error_led: gpiod::PD8<Output<PushPull>>,
    pub limits: LimitPins,
}

/// SPI1 slave pins (host bus)
pub struct Spi1Pins {
    pub nss: gpioa::PA4<Alternate<5>>,
    pub sck: gpioa::PA5<Alternate<5>>,
    pub miso: gpioa::PA6<Alternate<5>>,
    pub mosi: gpioa::PA7<Alternate<5>>,
}

/// Quadrature inputs, one timer per axis
pub struct EncoderPins {
    pub tim2_ch1: gpioa::PA0<Alternate<1>>,
    pub tim2_ch2: gpioa::PA1<Alternate<1>>,

    pub tim5_ch1: gpioh::PH10<Alternate<2>>,
    pub tim5_ch2: gpioh::PH11<Alternate<2>>,

    pub tim3_ch1: gpiob::PB4<Alternate<2>>,
    pub tim3_ch2: gpiob::PB5<Alternate<2>>,

    pub tim4_ch1: gpiod::PD12<Alternate<2>>,
    pub tim4_ch2: gpiod::PD13<Alternate<2>>,
}

/// Direction outputs. Axis W has none.
pub struct DirectionPins {
    pub x: gpiod::PD0<Output<PushPull>>,
    pub y: gpiod::PD1<Output<PushPull>>,
    pub z: gpiod::PD2<Output<PushPull>>,
}

/// Limit switches, pulled up, active-low
pub struct LimitPins {
    pub pe8: gpioe::PE8<Input<PullUp>>,
    pub pe9: gpioe::PE9<Input<PullUp>>,
    pub pe10: gpioe::PE10<Input<PullUp>>,
    pub pe11: gpioe::PE11<Input<PullUp>>,
    pub pe12: gpioe::PE12<Input<PullUp>>,
    pub pe13: gpioe::PE13<Input<PullUp>>,
    pub pe14: gpioe::PE14<Input<PullUp>>,
    pub pe15: gpioe::PE15<Input<PullUp>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(
        gpioa: pac::GPIOA,
        gpiob: pac::GPIOB,
        gpiod: pac::GPIOD,
        gpioe: pac::GPIOE,
        gpioh: pac::GPIOH,
    ) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();
        let gpioh = gpioh.split();

        Self {
            spi1: Spi1Pins {
                nss: gpioa.pa4.into_alternate::<5>(),
                sck: gpioa.pa5.into_alternate::<5>(),
                miso: gpioa.pa6.into_alternate::<5>(),
                mosi: gpioa.pa7.into_alternate::<5>(),
            },

            encoder: EncoderPins {
                tim2_ch1: gpioa.pa0.into_alternate::<1>(),
                tim2_ch2: gpioa.pa1.into_alternate::<1>(),
                tim5_ch1: gpioh.ph10.into_alternate::<2>(),
                tim5_ch2: gpioh.ph11.into_alternate::<2>(),
                tim3_ch1: gpiob.pb4.into_alternate::<2>(),
                tim3_ch2: gpiob.pb5.into_alternate::<2>(),
                tim4_ch1: gpiod.pd12.into_alternate::<2>(),
                tim4_ch2: gpiod.pd13.into_alternate::<2>(),
            },

            dir: DirectionPins {
                x: gpiod.pd0.into_push_pull_output(),
                y: gpiod.pd1.into_push_pull_output(),
                z: gpiod.pd2.into_push_pull_output(),
            },

            irq: gpiod.pd4.into_push_pull_output(),
            error_led: gpiod.pd8.into_push_pull_output(),

            limits: LimitPins {
                pe8: gpioe.pe8.into_pull_up_input(),
                pe9: gpioe.pe9.into_pull_up_input(),
                pe10: gpioe.pe10.into_pull_up_input(),
                pe11: gpioe.pe11.into_pull_up_input(),
                pe12: gpioe.pe12.into_pull_up_input(),
                pe13: gpioe.pe13.into_pull_up_input(),
                pe14: gpioe.pe14.into_pull_up_input(),
                pe15: gpioe.pe15.into_pull_up_input(),
            },
        }
    }
}
