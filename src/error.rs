//! Error types for the engine and the kernel.
//!
//! Both error classes are detected synchronously and reject the operation
//! with no partial mutation. [`CausalityViolation`] is a programming-error
//! class: fatal to the run, not worth retrying.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::SimTime;

/// Why an order failed validation. Checked before any matching attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InvalidOrder {
    #[error("negative price {0}")]
    NegativePrice(Decimal),
    #[error("non-positive quantity {0}")]
    NonPositiveQuantity(Decimal),
}

/// Errors from [`crate::engine::MatchingEngine::process`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid order: {0}")]
    InvalidOrder(#[from] InvalidOrder),
}

/// A scheduling operation that would move time backwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CausalityViolation {
    #[error("negative delay {0}")]
    NegativeDelay(SimTime),
    /// A popped event precedes the clock. Only reachable through a bug in
    /// delay computation; the kernel is corrupted once this fires.
    #[error("event time {event} precedes clock {clock}")]
    ClockRegression { event: SimTime, clock: SimTime },
}

/// Errors from [`crate::kernel::SimulationKernel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum KernelError {
    #[error("causality violation: {0}")]
    CausalityViolation(#[from] CausalityViolation),
}
