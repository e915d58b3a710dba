//! Scenario orchestration: wires agents, the engine, and the kernel
//! together into a reproducible simulated trading session.
//!
//! One periodic step event drives everything. Each step advances the fair
//! value random walk, wakes a random subset of agents, routes their intents
//! through the engine, and samples the level-1 quote. All randomness comes
//! from one seeded `StdRng`, so a given [`SimConfig`] always produces the
//! same [`SimReport`].

use log::{error, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::agents::{Account, Agent, MarketMaker, MarketView, MomentumTrader, NoiseTrader, OrderIntent};
use crate::engine::MatchingEngine;
use crate::error::KernelError;
use crate::kernel::SimulationKernel;
use crate::recorder::{QuoteRecorder, QuoteRow};
use crate::types::{AgentId, L1Snapshot, OrderForm, Side, SimTime, Trade};

/// Exogenous fair value, stepped once per market step as a random walk in
/// whole cents. Never drops below one cent.
#[derive(Clone, Debug)]
pub struct FairValueModel {
    value: Decimal,
    vol_ticks: i64,
}

impl FairValueModel {
    pub fn new(start: Decimal, vol_ticks: i64) -> Self {
        Self {
            value: start,
            vol_ticks,
        }
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn step(&mut self, rng: &mut StdRng) -> Decimal {
        let ticks = rng.gen_range(-self.vol_ticks..=self.vol_ticks);
        self.value = (self.value + Decimal::new(ticks, 2)).max(Decimal::new(1, 2));
        self.value
    }
}

/// Scenario parameters. [`Default`] gives a mixed population that trades
/// actively around a 100.00 fair value.
#[derive(Clone, Debug)]
pub struct SimConfig {
    pub seed: u64,
    pub num_noise: usize,
    pub num_market_makers: usize,
    pub num_momentum: usize,
    /// Virtual end time; the step event scheduled past it stays undispatched.
    pub horizon: SimTime,
    pub step_interval: SimTime,
    /// Chance an agent wakes on any given step.
    pub wake_probability: f64,
    pub fair_value_start: Decimal,
    pub fair_value_vol_ticks: i64,
    pub initial_cash: Decimal,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_noise: 80,
            num_market_makers: 10,
            num_momentum: 10,
            horizon: Decimal::from(300),
            step_interval: Decimal::ONE,
            wake_probability: 0.1,
            fair_value_start: Decimal::from(100),
            fair_value_vol_ticks: 10,
            initial_cash: Decimal::from(100_000),
        }
    }
}

/// The simulation context driven by the kernel.
pub struct Market {
    engine: MatchingEngine,
    agents: Vec<Box<dyn Agent>>,
    fair_value: FairValueModel,
    quotes: QuoteRecorder,
    rng: StdRng,
    step_interval: SimTime,
    wake_probability: f64,
}

impl Market {
    pub fn new(config: &SimConfig) -> Self {
        let mut agents: Vec<Box<dyn Agent>> = Vec::new();
        let mut next_id = 0u64;
        for _ in 0..config.num_noise {
            agents.push(Box::new(NoiseTrader::new(AgentId(next_id), config.initial_cash)));
            next_id += 1;
        }
        for _ in 0..config.num_market_makers {
            agents.push(Box::new(MarketMaker::new(AgentId(next_id), config.initial_cash)));
            next_id += 1;
        }
        for _ in 0..config.num_momentum {
            agents.push(Box::new(MomentumTrader::new(
                AgentId(next_id),
                config.initial_cash,
                5,
            )));
            next_id += 1;
        }
        // gen_bool panics outside [0, 1], so an out-of-range or NaN
        // probability is clamped rather than trusted.
        let wake_probability = if (0.0..=1.0).contains(&config.wake_probability) {
            config.wake_probability
        } else {
            let clamped = if config.wake_probability > 1.0 { 1.0 } else { 0.0 };
            warn!(
                "wake_probability {} outside [0, 1], clamped to {}",
                config.wake_probability, clamped
            );
            clamped
        };
        Self {
            engine: MatchingEngine::new(),
            agents,
            fair_value: FairValueModel::new(config.fair_value_start, config.fair_value_vol_ticks),
            quotes: QuoteRecorder::new(),
            rng: StdRng::seed_from_u64(config.seed),
            step_interval: config.step_interval,
            wake_probability,
        }
    }

    /// One market step at virtual time `time`.
    ///
    /// Agents are polled in id order and their intents applied immediately,
    /// so the book each agent sees reflects every earlier action this step.
    pub fn step(&mut self, time: SimTime) {
        let reference = self.fair_value.step(&mut self.rng);

        for idx in 0..self.agents.len() {
            if !self.rng.gen_bool(self.wake_probability) {
                continue;
            }
            let snapshot = self.engine.l1_snapshot();
            let view = MarketView {
                time,
                best_bid: snapshot.best_bid,
                best_ask: snapshot.best_ask,
                reference,
            };
            let intents = self.agents[idx].decide(&view, &mut self.rng);
            for intent in intents {
                self.apply_intent(idx, intent, time);
            }
        }

        self.quotes.record(time, &self.engine.l1_snapshot());
    }

    fn apply_intent(&mut self, agent_idx: usize, intent: OrderIntent, time: SimTime) {
        let owner = AgentId(agent_idx as u64);
        let form = match intent {
            OrderIntent::Cancel(order_id) => {
                if !self.engine.cancel(order_id) {
                    trace!("cancel missed order_id={} (already gone)", order_id.0);
                }
                return;
            }
            OrderIntent::Limit {
                side,
                price,
                quantity,
            } => OrderForm::limit(side, price, quantity, owner, time),
            OrderIntent::Market { side, quantity } => {
                OrderForm::market(side, quantity, owner, time)
            }
        };

        match self.engine.process(form) {
            Ok(submission) => {
                for trade in &submission.trades {
                    if let Some(buyer) = self.agents.get_mut(trade.buyer.0 as usize) {
                        buyer.on_fill(Side::Buy, trade.price, trade.quantity);
                    }
                    if let Some(seller) = self.agents.get_mut(trade.seller.0 as usize) {
                        seller.on_fill(Side::Sell, trade.price, trade.quantity);
                    }
                }
                if submission.resting_quantity > Decimal::ZERO {
                    self.agents[agent_idx].on_placed(submission.order_id);
                }
            }
            Err(err) => {
                warn!("order from agent {} rejected: {err}", owner.0);
            }
        }
    }

    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    fn into_report(self) -> SimReport {
        SimReport {
            final_snapshot: self.engine.l1_snapshot(),
            trades: self.engine.trades().to_vec(),
            quotes: self.quotes.rows().to_vec(),
            average_spread: self.quotes.average_spread(),
            accounts: self.agents.iter().map(|a| a.account()).collect(),
        }
    }
}

fn step_event(market: &mut Market, kernel: &mut SimulationKernel<Market>) {
    market.step(kernel.now());
    let interval = market.step_interval;
    if let Err(err) = kernel.schedule(interval, step_event) {
        error!("failed to reschedule market step: {err}");
    }
}

/// Everything a finished scenario leaves behind.
#[derive(Clone, Debug)]
pub struct SimReport {
    pub trades: Vec<Trade>,
    pub quotes: Vec<QuoteRow>,
    pub final_snapshot: L1Snapshot,
    pub average_spread: Option<Decimal>,
    pub accounts: Vec<Account>,
}

impl SimReport {
    pub fn total_volume(&self) -> Decimal {
        self.trades.iter().map(|t| t.quantity).sum()
    }
}

/// Build a market from `config` and run it to the horizon.
pub fn run_scenario(config: &SimConfig) -> Result<SimReport, KernelError> {
    let mut market = Market::new(config);
    let mut kernel = SimulationKernel::new();
    kernel.schedule(Decimal::ZERO, step_event)?;
    kernel.run(&mut market, Some(config.horizon))?;
    Ok(market.into_report())
}
