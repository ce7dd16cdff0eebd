// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![no_main]
#![no_std]

use core::cell::{Cell, RefCell};

use cortex_m::peripheral::NVIC;
use cortex_m_rt::entry;
use defmt_rtt as _;
use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use panic_halt as _;
use static_cell::StaticCell;

use hal::{
    pac::{self, interrupt},
    prelude::*,
};
use stm32f7xx_hal as hal;

use encoder_node::hw::{
    self, lines, BoardLimits, BoardPins, EncoderBank, PortDLine, SampleTick, SpiSlave,
    SysTickDelay,
};
use encoder_node::{
    ActiveLevel, AxisRegistry, CommandEngine, EngineConfig, LimitSignal, OutputLine,
    PositionSampler,
};

type Axes = AxisRegistry<PortDLine>;
type Signal = LimitSignal<BoardLimits, PortDLine>;
type Sampler = PositionSampler<'static, EncoderBank, PortDLine, BoardLimits, PortDLine>;

static AXES: StaticCell<Axes> = StaticCell::new();
static SIGNAL: StaticCell<Signal> = StaticCell::new();

// Handed to the interrupt handlers once bring-up is done.
static SAMPLER: Mutex<CriticalSectionRawMutex, RefCell<Option<Sampler>>> =
    Mutex::new(RefCell::new(None));
static LIMITS: Mutex<CriticalSectionRawMutex, Cell<Option<&'static Signal>>> =
    Mutex::new(Cell::new(None));

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = defmt::unwrap!(pac::Peripherals::take());
    let cp = defmt::unwrap!(cortex_m::Peripherals::take());

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    // GPIO
    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD, dp.GPIOE, dp.GPIOH);

    // Shared state
    let axes: &'static Axes = AXES.init(hw::board_axes(pins.dir));
    let signal: &'static Signal = SIGNAL.init(LimitSignal::new(
        BoardLimits::new(pins.limits),
        ActiveLevel::Low,
        OutputLine::active_high(PortDLine::new(pins.irq)),
    ));

    // Sampler on TIM6
    let encoders = EncoderBank::new(dp.TIM2, dp.TIM5, dp.TIM3, dp.TIM4);
    SAMPLER.lock(|sampler| {
        sampler.replace(Some(PositionSampler::new(encoders, axes, signal)));
    });
    let _tick = SampleTick::tim6(dp.TIM6, clocks.timclk1().raw(), hw::SAMPLE_RATE_HZ);

    // Limit switches on EXTI8..15
    LIMITS.lock(|limits| limits.set(Some(signal)));
    lines::listen_limits(&dp.SYSCFG, &dp.EXTI);

    unsafe {
        NVIC::unmask(pac::Interrupt::TIM6_DAC);
        NVIC::unmask(pac::Interrupt::EXTI9_5);
        NVIC::unmask(pac::Interrupt::EXTI15_10);
    }

    // Host bus (SPI1 slave)
    let _spi_pins = pins.spi1;
    let spi = SpiSlave::spi1(dp.SPI1);

    let error = OutputLine::active_high(PortDLine::new(pins.error_led));
    let delay = SysTickDelay::new(cp.SYST, clocks.sysclk().raw());

    defmt::info!(
        "encoder node up: {} axes, sampling at {} Hz",
        axes.len(),
        hw::SAMPLE_RATE_HZ
    );

    let mut engine = CommandEngine::new(spi, axes, signal, error, delay, EngineConfig::default());
    engine.run()
}

#[interrupt]
fn TIM6_DAC() {
    SampleTick::clear_pending();
    SAMPLER.lock(|sampler| {
        if let Some(sampler) = sampler.borrow_mut().as_mut() {
            sampler.pass();
        }
    });
}

#[interrupt]
fn EXTI9_5() {
    limit_edge();
}

#[interrupt]
fn EXTI15_10() {
    limit_edge();
}

fn limit_edge() {
    lines::clear_limit_pending();
    LIMITS.lock(|limits| {
        if let Some(signal) = limits.get() {
            signal.on_limit_edge();
        }
    });
}
