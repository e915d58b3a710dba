//! Trading agents: the capability interface and three concrete strategies.
//!
//! An agent is a single-method decision contract plus its own account state
//! (cash and inventory); no state is shared between agents. All randomness
//! comes from the one seeded `StdRng` the market threads through `decide`,
//! so a fixed seed reproduces every decision.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::Rng;
use rust_decimal::Decimal;

use crate::types::{AgentId, OrderId, Side, SimTime};

/// What an agent wants done, translated into engine calls by the market.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderIntent {
    Limit {
        side: Side,
        price: Decimal,
        quantity: Decimal,
    },
    Market {
        side: Side,
        quantity: Decimal,
    },
    Cancel(OrderId),
}

/// What an agent sees when it wakes: the level-1 picture plus the fair
/// value reference it falls back to when the book is one-sided or empty.
#[derive(Clone, Copy, Debug)]
pub struct MarketView {
    pub time: SimTime,
    pub best_bid: Option<Decimal>,
    pub best_ask: Option<Decimal>,
    /// Exogenous fair value (random walk), stepped once per market step.
    pub reference: Decimal,
}

impl MarketView {
    pub fn mid(&self) -> Option<Decimal> {
        match (self.best_bid, self.best_ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::from(2)),
            _ => None,
        }
    }

    /// Midpoint when both sides are quoted, otherwise the reference value.
    pub fn indicative_mid(&self) -> Decimal {
        self.mid().unwrap_or(self.reference)
    }
}

/// Per-agent cash and inventory, updated on every fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Account {
    pub cash: Decimal,
    pub inventory: Decimal,
}

impl Account {
    pub fn new(cash: Decimal) -> Self {
        Self {
            cash,
            inventory: Decimal::ZERO,
        }
    }

    pub fn apply_fill(&mut self, side: Side, price: Decimal, quantity: Decimal) {
        match side {
            Side::Buy => {
                self.inventory += quantity;
                self.cash -= price * quantity;
            }
            Side::Sell => {
                self.inventory -= quantity;
                self.cash += price * quantity;
            }
        }
    }
}

/// A trading strategy woken periodically by the market.
pub trait Agent {
    fn id(&self) -> AgentId;

    /// Decide on zero or more order intents from the current view.
    fn decide(&mut self, view: &MarketView, rng: &mut StdRng) -> Vec<OrderIntent>;

    /// One of this agent's orders traded `quantity` at `price`.
    fn on_fill(&mut self, side: Side, price: Decimal, quantity: Decimal);

    /// A limit intent from this agent rested on the book with this id.
    fn on_placed(&mut self, _order_id: OrderId) {}

    fn account(&self) -> Account;
}

/// Uninformed liquidity: random side and size, half limit orders quoted
/// around the fair value, half market orders.
pub struct NoiseTrader {
    id: AgentId,
    account: Account,
    half_spread: Decimal,
}

impl NoiseTrader {
    pub fn new(id: AgentId, cash: Decimal) -> Self {
        Self {
            id,
            account: Account::new(cash),
            // 0.10 on either side of the perceived value.
            half_spread: Decimal::new(10, 2),
        }
    }
}

impl Agent for NoiseTrader {
    fn id(&self) -> AgentId {
        self.id
    }

    fn decide(&mut self, view: &MarketView, rng: &mut StdRng) -> Vec<OrderIntent> {
        // Perceived value: reference plus uniform noise in whole cents.
        let noise = Decimal::new(rng.gen_range(-50..=50), 2);
        let value = view.reference + noise;
        let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
        let quantity = Decimal::from(rng.gen_range(1..=10));

        if rng.gen_bool(0.5) {
            let price = match side {
                Side::Buy => value - self.half_spread,
                Side::Sell => value + self.half_spread,
            };
            if price <= Decimal::ZERO {
                return Vec::new();
            }
            vec![OrderIntent::Limit {
                side,
                price,
                quantity,
            }]
        } else {
            vec![OrderIntent::Market { side, quantity }]
        }
    }

    fn on_fill(&mut self, side: Side, price: Decimal, quantity: Decimal) {
        self.account.apply_fill(side, price, quantity);
    }

    fn account(&self) -> Account {
        self.account
    }
}

/// Two-sided quotes around an inventory-skewed reservation price. Stale
/// quotes are withdrawn before each re-quote.
pub struct MarketMaker {
    id: AgentId,
    account: Account,
    half_spread: Decimal,
    /// Reservation-price shift per unit of inventory.
    skew_per_unit: Decimal,
    quote_size: Decimal,
    open_quotes: Vec<OrderId>,
}

impl MarketMaker {
    pub fn new(id: AgentId, cash: Decimal) -> Self {
        Self {
            id,
            account: Account::new(cash),
            half_spread: Decimal::new(5, 2),
            skew_per_unit: Decimal::new(1, 2),
            quote_size: Decimal::from(10),
            open_quotes: Vec::new(),
        }
    }
}

impl Agent for MarketMaker {
    fn id(&self) -> AgentId {
        self.id
    }

    fn decide(&mut self, view: &MarketView, _rng: &mut StdRng) -> Vec<OrderIntent> {
        let mid = view.indicative_mid();
        let mut intents: Vec<OrderIntent> =
            self.open_quotes.drain(..).map(OrderIntent::Cancel).collect();

        let reservation = (mid - self.account.inventory * self.skew_per_unit).round_dp(2);
        let bid = reservation - self.half_spread;
        let ask = reservation + self.half_spread;
        if bid > Decimal::ZERO {
            intents.push(OrderIntent::Limit {
                side: Side::Buy,
                price: bid,
                quantity: self.quote_size,
            });
        }
        intents.push(OrderIntent::Limit {
            side: Side::Sell,
            price: ask,
            quantity: self.quote_size,
        });
        intents
    }

    fn on_fill(&mut self, side: Side, price: Decimal, quantity: Decimal) {
        self.account.apply_fill(side, price, quantity);
    }

    fn on_placed(&mut self, order_id: OrderId) {
        self.open_quotes.push(order_id);
    }

    fn account(&self) -> Account {
        self.account
    }
}

/// Trend follower: compares the indicative mid against its value `lookback`
/// steps ago and chases the drift with market orders.
pub struct MomentumTrader {
    id: AgentId,
    account: Account,
    lookback: usize,
    history: VecDeque<Decimal>,
    order_size: Decimal,
    threshold: Decimal,
}

impl MomentumTrader {
    pub fn new(id: AgentId, cash: Decimal, lookback: usize) -> Self {
        Self {
            id,
            account: Account::new(cash),
            lookback,
            history: VecDeque::new(),
            order_size: Decimal::from(10),
            threshold: Decimal::new(1, 2),
        }
    }
}

impl Agent for MomentumTrader {
    fn id(&self) -> AgentId {
        self.id
    }

    fn decide(&mut self, view: &MarketView, _rng: &mut StdRng) -> Vec<OrderIntent> {
        self.history.push_back(view.indicative_mid());
        if self.history.len() > self.lookback {
            self.history.pop_front();
        }
        if self.history.len() < self.lookback {
            return Vec::new();
        }
        let change = self.history[self.history.len() - 1] - self.history[0];
        if change > self.threshold {
            vec![OrderIntent::Market {
                side: Side::Buy,
                quantity: self.order_size,
            }]
        } else if change < -self.threshold {
            vec![OrderIntent::Market {
                side: Side::Sell,
                quantity: self.order_size,
            }]
        } else {
            Vec::new()
        }
    }

    fn on_fill(&mut self, side: Side, price: Decimal, quantity: Decimal) {
        self.account.apply_fill(side, price, quantity);
    }

    fn account(&self) -> Account {
        self.account
    }
}
