//! Core data model: ids, order messages, and the level-1 snapshot.
//!
//! All identifiers are newtype wrappers. Prices and quantities are
//! [`Decimal`]; a market order is an order whose `price` is `None`.

use rust_decimal::Decimal;

/// Virtual simulation time. Not wall clock; advanced only by the kernel.
pub type SimTime = Decimal;

/// Order sequence id. Assigned by the engine at submission, strictly
/// increasing, never reused. Used for price-time tie-breaking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct OrderId(pub u64);

/// Owner of an order (a trading agent).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AgentId(pub u64);

/// Order side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side an incoming order matches against.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// An order as submitted by a collaborator, before the engine stamps an id.
///
/// `price: None` means a market order: it crosses until exhausted or the
/// opposite book empties and never rests.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct OrderForm {
    pub side: Side,
    pub price: Option<Decimal>,
    pub quantity: Decimal,
    pub owner: AgentId,
    /// Submission time on the simulation clock.
    pub timestamp: SimTime,
}

impl OrderForm {
    pub fn limit(
        side: Side,
        price: Decimal,
        quantity: Decimal,
        owner: AgentId,
        timestamp: SimTime,
    ) -> Self {
        Self {
            side,
            price: Some(price),
            quantity,
            owner,
            timestamp,
        }
    }

    pub fn market(side: Side, quantity: Decimal, owner: AgentId, timestamp: SimTime) -> Self {
        Self {
            side,
            price: None,
            quantity,
            owner,
            timestamp,
        }
    }

    pub fn is_market(&self) -> bool {
        self.price.is_none()
    }
}

/// An order with its engine-assigned sequence id, as seen by the matcher.
#[derive(Clone, Debug)]
pub struct Order {
    pub order_id: OrderId,
    pub side: Side,
    pub price: Option<Decimal>,
    pub quantity: Decimal,
    pub owner: AgentId,
    pub timestamp: SimTime,
}

/// One executed match. Immutable once appended to the tape.
///
/// `price` is always the resting (maker) order's price; `timestamp` is the
/// aggressor's submission time.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Trade {
    pub price: Decimal,
    pub quantity: Decimal,
    pub timestamp: SimTime,
    pub buyer: AgentId,
    pub seller: AgentId,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
}

/// Best bid and best ask. `None` for an empty side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct L1Snapshot {
    pub best_bid: Option<Decimal>,
    pub best_ask: Option<Decimal>,
}

impl L1Snapshot {
    /// Midpoint, when both sides are quoted.
    pub fn mid(&self) -> Option<Decimal> {
        match (self.best_bid, self.best_ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::from(2)),
            _ => None,
        }
    }

    /// Quoted spread, when both sides are quoted.
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid, self.best_ask) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }
}
