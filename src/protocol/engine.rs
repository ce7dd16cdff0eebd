// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command engine: the host-facing side of the node.
//!
//! Each `step()` waits for one command byte, decodes it and runs it against the axis registry:
//!
//! ```text
//! AwaitCommand -> Decode -> ReadReply | WriteExchange | StatusReply | Broadcast | ErrorSignal
//!      ^                                                                              |
//!      +------------------------------------------------------------------------------+
//! ```
//!
//! Axis locks are only held while copying fields in or out, never across a bus transfer. A value
//! exchange therefore reads the current value, releases the lock, clocks the 4 bytes, and takes
//! the lock again to store what the host sent.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use super::bus::HostBus;
use super::messages::{Command, Operation, UnknownCommand};
use crate::axis::{AxisId, AxisRegistry, AxisState, Lookup};
use crate::config::{EngineConfig, BROADCAST, MAX_AXES};
use crate::line::OutputLine;
use crate::signal::{LimitInputs, LimitSignal, StatusRecord};

/// What a dispatched command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// 4-byte full-duplex exchange with one axis. `applied` is set when the received value was
    /// stored.
    Exchanged {
        axis: AxisId,
        sent: i32,
        received: i32,
        applied: bool,
    },
    /// Position of one axis set to 0.
    Cleared(AxisId),
    /// Operation applied to (or read from) every configured axis.
    Broadcast { op: Operation, axes: usize },
    /// Status record sent; `acknowledged` when the command also released the interrupt line.
    Status {
        record: StatusRecord,
        acknowledged: bool,
    },
    /// The selector names no axis (or the class has no broadcast form). Nothing was sent.
    NoAxis(Command),
    /// Unknown operation class. Nothing was sent and the error indicator is on.
    Rejected(u8),
}

pub struct CommandEngine<'a, B, D, L, P: OutputPin, E: OutputPin, T> {
    bus: B,
    axes: &'a AxisRegistry<D>,
    signal: &'a LimitSignal<L, P>,
    error: OutputLine<E>,
    delay: T,
    config: EngineConfig,
}

impl<'a, B, D, L, P, E, T> CommandEngine<'a, B, D, L, P, E, T>
where
    B: HostBus,
    D: OutputPin,
    L: LimitInputs,
    P: OutputPin,
    E: OutputPin,
    T: DelayNs,
{
    pub fn new(
        bus: B,
        axes: &'a AxisRegistry<D>,
        signal: &'a LimitSignal<L, P>,
        error: OutputLine<E>,
        delay: T,
        config: EngineConfig,
    ) -> Self {
        Self {
            bus,
            axes,
            signal,
            error,
            delay,
            config,
        }
    }

    /// Serve the host forever.
    pub fn run(&mut self) -> ! {
        loop {
            let _ = self.poll();
        }
    }

    /// Run one command. A bus fault abandons it, latches the error indicator and resynchronizes
    /// the bus, so the next byte from the host starts a fresh command.
    pub fn poll(&mut self) -> Result<Outcome, B::Error> {
        let result = self.step();
        if result.is_err() {
            warn!("bus fault, dropping command");
            self.error.assert();
            self.bus.recover();
        }
        result
    }

    /// Wait for one command byte and run it.
    pub fn step(&mut self) -> Result<Outcome, B::Error> {
        let byte = self.bus.read_command()?;
        self.dispatch(byte)
    }

    /// Run an already-received command byte.
    pub fn dispatch(&mut self, byte: u8) -> Result<Outcome, B::Error> {
        let command = match Command::decode(byte) {
            Ok(command) => command,
            Err(UnknownCommand(byte)) => return Ok(self.reject(byte)),
        };
        trace!("command {=u8:#x}", byte);

        let outcome = match command.op {
            Operation::Counter => self.counter(command)?,
            Operation::ClearCounter => self.clear(command),
            Operation::Target => {
                self.exchange(command, AxisState::target, AxisState::set_target)?
            }
            Operation::Threshold => self.threshold(command)?,
            Operation::Direction => self.direction(command)?,
            Operation::Status => self.status(command)?,
        };

        self.error.release();
        Ok(outcome)
    }

    fn reject(&mut self, byte: u8) -> Outcome {
        warn!("unknown command {=u8:#x}", byte);
        self.error.assert();
        // Give a host that restarted mid-transaction time to finish clocking before we listen
        // for a command byte again. Best effort only; the protocol has no framing.
        if self.config.resync_delay_us > 0 {
            self.delay.delay_us(self.config.resync_delay_us);
        }
        self.bus.recover();
        Outcome::Rejected(byte)
    }

    /// Read (and optionally write) one field of one axis in a single 4-byte exchange.
    fn exchange(
        &mut self,
        command: Command,
        get: impl FnOnce(&AxisState<D>) -> i32,
        set: impl FnOnce(&AxisState<D>, i32),
    ) -> Result<Outcome, B::Error> {
        let axes = self.axes;
        let axis = match axes.lookup(command.axis) {
            Lookup::Axis(axis) => axis,
            Lookup::Broadcast | Lookup::Absent => return Ok(Outcome::NoAxis(command)),
        };

        let sent = get(axis);
        let received = self.bus.exchange(sent)?;
        if command.write {
            set(axis, received);
        }

        Ok(Outcome::Exchanged {
            axis: axis.id(),
            sent,
            received,
            applied: command.write,
        })
    }

    fn counter(&mut self, command: Command) -> Result<Outcome, B::Error> {
        if command.axis != BROADCAST {
            return self.exchange(command, AxisState::position, AxisState::set_position);
        }

        // Combined read: snapshot every position first so the reply covers one instant as
        // closely as possible, then clock them out in id order.
        let mut positions = [0i32; MAX_AXES];
        let mut count = 0;
        for (slot, axis) in positions.iter_mut().zip(self.axes.iter()) {
            *slot = axis.position();
            count += 1;
        }
        for position in &positions[..count] {
            self.bus.write_all(&position.to_be_bytes())?;
        }

        Ok(Outcome::Broadcast {
            op: Operation::Counter,
            axes: count,
        })
    }

    fn clear(&mut self, command: Command) -> Outcome {
        match self.axes.lookup(command.axis) {
            Lookup::Axis(axis) => {
                axis.set_position(0);
                Outcome::Cleared(axis.id())
            }
            Lookup::Broadcast => {
                let mut count = 0;
                for axis in self.axes.iter() {
                    axis.set_position(0);
                    count += 1;
                }
                debug!("cleared {} axes", count);
                Outcome::Broadcast {
                    op: Operation::ClearCounter,
                    axes: count,
                }
            }
            Lookup::Absent => Outcome::NoAxis(command),
        }
    }

    fn threshold(&mut self, command: Command) -> Result<Outcome, B::Error> {
        if command.axis != BROADCAST {
            return self.exchange(command, AxisState::threshold, AxisState::set_threshold);
        }

        // There is no single value to report for all axes, so the broadcast form sends zeros and
        // only matters when the host writes.
        let received = self.bus.exchange(0)?;
        let mut count = 0;
        if command.write {
            for axis in self.axes.iter() {
                axis.set_threshold(received);
                count += 1;
            }
            debug!("threshold {} applied to {} axes", received, count);
        }

        Ok(Outcome::Broadcast {
            op: Operation::Threshold,
            axes: count,
        })
    }

    fn direction(&mut self, command: Command) -> Result<Outcome, B::Error> {
        self.exchange(
            command,
            |_| 0,
            |axis, value| {
                axis.set_direction(value & 1 != 0);
            },
        )
    }

    fn status(&mut self, command: Command) -> Result<Outcome, B::Error> {
        let record = self.signal.status();
        self.bus.write_all(&record.to_bytes())?;

        // The status class carries no payload, so its write form is the interrupt acknowledge.
        // The record above was captured before releasing the line.
        if command.write {
            self.signal.acknowledge();
        }

        Ok(Outcome::Status {
            record,
            acknowledged: command.write,
        })
    }

    /// Whether the error indicator is currently on.
    #[inline]
    pub fn error_indicator(&self) -> bool {
        self.error.is_asserted()
    }

    #[inline]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    #[inline]
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn free(self) -> (B, OutputLine<E>, T) {
        (self.bus, self.error, self.delay)
    }
}
