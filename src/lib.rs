//! Deterministic agent-based limit order book market simulator.
//!
//! A price-time priority [`MatchingEngine`] sits at the center; a
//! discrete-event [`SimulationKernel`] drives virtual time; heterogeneous
//! [`agents`] supply the order flow. Replaying the same [`SimConfig`]
//! reproduces the same trade tape bit for bit.

pub mod agents;
pub mod engine;
pub mod error;
pub mod kernel;
pub mod market;
pub mod matching;
pub mod order_book;
pub mod recorder;
pub mod types;

pub use engine::{MatchingEngine, Submission};
pub use error::{CausalityViolation, EngineError, InvalidOrder, KernelError};
pub use kernel::SimulationKernel;
pub use market::{run_scenario, Market, SimConfig, SimReport};
pub use order_book::OrderBook;
pub use types::{AgentId, L1Snapshot, Order, OrderForm, OrderId, Side, SimTime, Trade};
