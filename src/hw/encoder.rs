// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Quadrature encoder support via STM32F7 timers in encoder mode.
//!
//! TIM2 and TIM5 count over the full 32-bit range. TIM3 and TIM4 only have 16-bit counters, so
//! `ExtendedEncoder` folds their wrapping count into a free-running `i32`; it has to be read at
//! least once per 32768 counts, which the 10 kHz sampler tick covers with a wide margin.

use stm32f7xx_hal::pac;

use crate::axis::{AxisId, QuadratureSource};

pub struct Encoder<TIM> {
    tim: TIM,
}

impl<TIM> Encoder<TIM> {
    /// Consume the wrapper and return the underlying timer peripheral.
    #[inline]
    pub fn free(self) -> TIM {
        self.tim
    }
}

/// Configure a general-purpose timer for encoder mode 3 (count on both TI1 and TI2 edges), reset
/// its counter and start it.
macro_rules! encoder_mode {
    ($tim:expr, $arr:expr) => {{
        let tim = &$tim;

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        tim.arr.write(|w| unsafe { w.bits($arr) });

        // Slave mode: encoder mode 3
        tim.smcr.modify(|_, w| w.sms().bits(0b011));

        // CH1/CH2 as inputs from TI1/TI2
        tim.ccmr1_input()
            .modify(|_, w| w.cc1s().ti1().cc2s().ti2());

        // Non-inverted polarity, both channels enabled.
        tim.ccer.modify(|_, w| {
            w.cc1p()
                .clear_bit()
                .cc2p()
                .clear_bit()
                .cc1e()
                .set_bit()
                .cc2e()
                .set_bit()
        });

        tim.cnt.write(|w| unsafe { w.bits(0) });
        tim.cr1.modify(|_, w| w.cen().set_bit());
    }};
}

macro_rules! wide_encoder {
    ($TIM:ident, $ctor:ident, $en:ident) => {
        impl Encoder<pac::$TIM> {
            #[doc = concat!("Enable and configure ", stringify!($TIM), " as a 32-bit quadrature encoder.")]
            #[allow(unused_unsafe)]
            pub fn $ctor(tim: pac::$TIM) -> Self {
                let rcc = unsafe { &*pac::RCC::ptr() };
                rcc.apb1enr.modify(|_, w| w.$en().set_bit());

                encoder_mode!(tim, 0xFFFF_FFFF);
                Self { tim }
            }

            /// Interpret the counter as a signed 32-bit count.
            #[inline]
            pub fn count(&self) -> i32 {
                self.tim.cnt.read().bits() as i32
            }
        }
    };
}

macro_rules! narrow_encoder {
    ($TIM:ident, $ctor:ident, $en:ident) => {
        impl Encoder<pac::$TIM> {
            #[doc = concat!("Enable and configure ", stringify!($TIM), " as a 16-bit quadrature encoder.")]
            #[allow(unused_unsafe)]
            pub fn $ctor(tim: pac::$TIM) -> Self {
                let rcc = unsafe { &*pac::RCC::ptr() };
                rcc.apb1enr.modify(|_, w| w.$en().set_bit());

                encoder_mode!(tim, 0xFFFF);
                Self { tim }
            }

            /// Read the raw 16-bit counter value.
            #[inline]
            pub fn raw(&self) -> u16 {
                self.tim.cnt.read().bits() as u16
            }
        }

        impl Narrow for Encoder<pac::$TIM> {
            #[inline]
            fn raw(&self) -> u16 {
                Encoder::<pac::$TIM>::raw(self)
            }
        }
    };
}

wide_encoder!(TIM2, tim2, tim2en);
wide_encoder!(TIM5, tim5, tim5en);
narrow_encoder!(TIM3, tim3, tim3en);
narrow_encoder!(TIM4, tim4, tim4en);

/// A 16-bit encoder counter.
pub trait Narrow {
    fn raw(&self) -> u16;
}

/// 16-bit encoder extended in software to a free-running 32-bit count.
pub struct ExtendedEncoder<E> {
    encoder: E,
    last: u16,
    count: i32,
}

impl<E: Narrow> ExtendedEncoder<E> {
    pub fn new(encoder: E) -> Self {
        let last = encoder.raw();
        Self {
            encoder,
            last,
            count: 0,
        }
    }

    /// Fold the counter movement since the last call into the running count.
    pub fn count(&mut self) -> i32 {
        let raw = self.encoder.raw();
        let step = raw.wrapping_sub(self.last) as i16;
        self.last = raw;
        self.count = self.count.wrapping_add(i32::from(step));
        self.count
    }

    pub fn free(self) -> E {
        self.encoder
    }
}

/// The four encoder inputs of the board, one per axis.
pub struct EncoderBank {
    pub x: Encoder<pac::TIM2>,
    pub y: Encoder<pac::TIM5>,
    pub z: ExtendedEncoder<Encoder<pac::TIM3>>,
    pub w: ExtendedEncoder<Encoder<pac::TIM4>>,
}

impl EncoderBank {
    pub fn new(tim2: pac::TIM2, tim5: pac::TIM5, tim3: pac::TIM3, tim4: pac::TIM4) -> Self {
        Self {
            x: Encoder::tim2(tim2),
            y: Encoder::tim5(tim5),
            z: ExtendedEncoder::new(Encoder::tim3(tim3)),
            w: ExtendedEncoder::new(Encoder::tim4(tim4)),
        }
    }
}

impl QuadratureSource for EncoderBank {
    fn raw_count(&mut self, axis: AxisId) -> i32 {
        match axis {
            AxisId::X => self.x.count(),
            AxisId::Y => self.y.count(),
            AxisId::Z => self.z.count(),
            AxisId::W => self.w.count(),
            _ => 0,
        }
    }
}
