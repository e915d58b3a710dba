//! Discrete-event simulation kernel: a virtual clock and an event queue.
//!
//! Generic over a context type `C` (the simulation state) that the kernel
//! never inspects. Callbacks receive `(&mut C, &mut SimulationKernel<C>)` so
//! they can submit orders and schedule further events; the popped event owns
//! its callback, which is what makes handing the kernel back borrow-safe.
//!
//! Events are keyed by (absolute time, insertion counter): dispatch is in
//! non-decreasing time order, FIFO among equal times, so a fixed sequence of
//! `schedule` calls replays identically on any host.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rust_decimal::Decimal;

use crate::error::{CausalityViolation, KernelError};
use crate::types::SimTime;

type Callback<C> = Box<dyn FnOnce(&mut C, &mut SimulationKernel<C>)>;

/// Explicit ordering key for the event queue: time first, then insertion
/// order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct EventKey {
    time: SimTime,
    seq: u64,
}

struct Scheduled<C> {
    key: EventKey,
    callback: Callback<C>,
}

impl<C> PartialEq for Scheduled<C> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<C> Eq for Scheduled<C> {}

impl<C> PartialOrd for Scheduled<C> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<C> Ord for Scheduled<C> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

/// Single-clock discrete-event kernel.
pub struct SimulationKernel<C> {
    clock: SimTime,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Scheduled<C>>>,
}

impl<C> Default for SimulationKernel<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> SimulationKernel<C> {
    pub fn new() -> Self {
        Self {
            clock: Decimal::ZERO,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> SimTime {
        self.clock
    }

    /// Number of events waiting in the queue.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Schedule `callback` to run `delay` after the current virtual time.
    ///
    /// A negative delay is a [`CausalityViolation`]: causality is
    /// forward-only, and nothing is enqueued.
    pub fn schedule(
        &mut self,
        delay: SimTime,
        callback: impl FnOnce(&mut C, &mut SimulationKernel<C>) + 'static,
    ) -> Result<(), KernelError> {
        if delay < Decimal::ZERO {
            return Err(CausalityViolation::NegativeDelay(delay).into());
        }
        let key = EventKey {
            time: self.clock + delay,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.queue.push(Reverse(Scheduled {
            key,
            callback: Box::new(callback),
        }));
        Ok(())
    }

    /// Pop and dispatch events in key order until the queue empties or the
    /// next event would pass `until`.
    ///
    /// When the bound stops the run, the offending event stays in the queue
    /// and the clock does not advance past the bound. A popped event whose
    /// timestamp precedes the clock means the kernel is corrupted and fails
    /// the run with [`CausalityViolation::ClockRegression`].
    pub fn run(&mut self, ctx: &mut C, until: Option<SimTime>) -> Result<(), KernelError> {
        loop {
            let next_time = match self.queue.peek() {
                Some(Reverse(event)) => event.key.time,
                None => break,
            };
            if let Some(bound) = until {
                if next_time > bound {
                    break;
                }
            }
            let Some(Reverse(event)) = self.queue.pop() else {
                break;
            };
            if event.key.time < self.clock {
                return Err(CausalityViolation::ClockRegression {
                    event: event.key.time,
                    clock: self.clock,
                }
                .into());
            }
            self.clock = event.key.time;
            (event.callback)(ctx, self);
        }
        Ok(())
    }
}
