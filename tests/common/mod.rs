// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host-side stand-ins for the board peripherals.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use critical_section as _;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

use encoder_node::protocol::Outcome;
use encoder_node::{
    ActiveLevel, AxisId, AxisRegistry, CommandEngine, EngineConfig, HostBus, LimitInputs,
    LimitSignal, OutputLine, PositionSampler, QuadratureSource,
};

/// The host stopped clocking: the script ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusClosed;

/// Host side of the bus: bytes the host will clock in, and every byte the node clocked out
/// after the command byte.
#[derive(Default)]
pub struct ScriptedBus {
    incoming: VecDeque<u8>,
    replies: Vec<u8>,
    recoveries: usize,
}

impl ScriptedBus {
    pub fn push(&mut self, bytes: &[u8]) {
        self.incoming.extend(bytes.iter().copied());
    }

    pub fn take_replies(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.replies)
    }

    /// Bytes the host queued that the node hasn't clocked yet.
    pub fn unread(&self) -> usize {
        self.incoming.len()
    }

    /// How many times the engine asked the bus to resynchronize.
    pub fn recoveries(&self) -> usize {
        self.recoveries
    }
}

impl HostBus for ScriptedBus {
    type Error = BusClosed;

    fn transfer_byte(&mut self, byte: u8) -> Result<u8, BusClosed> {
        let received = self.incoming.pop_front().ok_or(BusClosed)?;
        self.replies.push(byte);
        Ok(received)
    }

    fn read_command(&mut self) -> Result<u8, BusClosed> {
        self.incoming.pop_front().ok_or(BusClosed)
    }

    // Leaves the script alone so tests can see what the engine consumed.
    fn recover(&mut self) {
        self.recoveries += 1;
    }
}

/// Output pin whose level can be observed from the test.
#[derive(Clone, Default)]
pub struct Probe(Arc<ProbeState>);

#[derive(Default)]
pub struct ProbeState {
    high: AtomicBool,
    rising_edges: AtomicU32,
}

impl Probe {
    pub fn is_high(&self) -> bool {
        self.0.high.load(Ordering::SeqCst)
    }

    pub fn rising_edges(&self) -> u32 {
        self.0.rising_edges.load(Ordering::SeqCst)
    }
}

impl ErrorType for Probe {
    type Error = Infallible;
}

impl OutputPin for Probe {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.high.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        if !self.0.high.swap(true, Ordering::SeqCst) {
            self.0.rising_edges.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// Free-running decoder counts, shared with the test.
#[derive(Clone, Default)]
pub struct Counts(Arc<[AtomicI32; 8]>);

impl Counts {
    pub fn set(&self, axis: AxisId, value: i32) {
        self.0[axis.index()].store(value, Ordering::SeqCst);
    }

    /// Move the decoder by `steps`, wrapping like the hardware counter.
    pub fn step(&self, axis: AxisId, steps: i32) {
        let slot = &self.0[axis.index()];
        let now = slot.load(Ordering::SeqCst);
        slot.store(now.wrapping_add(steps), Ordering::SeqCst);
    }
}

impl QuadratureSource for Counts {
    fn raw_count(&mut self, axis: AxisId) -> i32 {
        self.0[axis.index()].load(Ordering::SeqCst)
    }
}

/// Active-low limit switches (pulled up, a pressed switch reads low).
#[derive(Clone)]
pub struct Switches(Arc<AtomicU8>);

impl Switches {
    pub fn released() -> Self {
        Self(Arc::new(AtomicU8::new(0xFF)))
    }

    pub fn press(&self, input: u8) {
        self.0.fetch_and(!(1 << input), Ordering::SeqCst);
    }

    pub fn release(&self, input: u8) {
        self.0.fetch_or(1 << input, Ordering::SeqCst);
    }
}

impl LimitInputs for Switches {
    fn read_levels(&self) -> u8 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Delay that only records how long it was asked to wait.
#[derive(Clone, Default)]
pub struct Waits(Arc<AtomicU64>);

impl Waits {
    pub fn total_ns(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

impl DelayNs for Waits {
    fn delay_ns(&mut self, ns: u32) {
        self.0.fetch_add(u64::from(ns), Ordering::SeqCst);
    }
}

pub type Registry = AxisRegistry<Probe>;
pub type Signal = LimitSignal<Switches, Probe>;
pub type Engine<'a> = CommandEngine<'a, ScriptedBus, Probe, Switches, Probe, Probe, Waits>;
pub type Sampler<'a> = PositionSampler<'a, Counts, Probe, Switches, Probe>;

/// A node with axes X and Y (both with direction lines) and Z (without one).
pub struct Rig {
    pub axes: Registry,
    pub signal: Signal,
    pub counts: Counts,
    pub switches: Switches,
    pub irq: Probe,
    pub error: Probe,
    pub dir_x: Probe,
    pub dir_y: Probe,
    pub waits: Waits,
}

impl Rig {
    pub fn new() -> Self {
        let dir_x = Probe::default();
        let dir_y = Probe::default();
        let irq = Probe::default();
        let switches = Switches::released();

        let axes = AxisRegistry::new()
            .with_axis(AxisId::X, Some(dir_x.clone()))
            .with_axis(AxisId::Y, Some(dir_y.clone()))
            .with_axis(AxisId::Z, None);
        let signal = LimitSignal::new(
            switches.clone(),
            ActiveLevel::Low,
            OutputLine::active_high(irq.clone()),
        );

        Self {
            axes,
            signal,
            counts: Counts::default(),
            switches,
            irq,
            error: Probe::default(),
            dir_x,
            dir_y,
            waits: Waits::default(),
        }
    }

    pub fn engine(&self) -> Engine<'_> {
        CommandEngine::new(
            ScriptedBus::default(),
            &self.axes,
            &self.signal,
            OutputLine::active_high(self.error.clone()),
            self.waits.clone(),
            EngineConfig::default(),
        )
    }

    pub fn sampler(&self) -> Sampler<'_> {
        PositionSampler::new(self.counts.clone(), &self.axes, &self.signal)
    }

    pub fn axis(&self, id: AxisId) -> &encoder_node::AxisState<Probe> {
        match self.axes.get(id) {
            Some(axis) => axis,
            None => panic!("axis {id:?} not configured"),
        }
    }
}

/// Clock one command (and its payload) through the engine. Returns the outcome and the bytes the
/// node sent back.
pub fn transact(engine: &mut Engine<'_>, bytes: &[u8]) -> (Outcome, Vec<u8>) {
    engine.bus_mut().push(bytes);
    let outcome = match engine.step() {
        Ok(outcome) => outcome,
        Err(err) => panic!("bus closed mid-command: {err:?}"),
    };
    (outcome, engine.bus_mut().take_replies())
}
