//! Resting liquidity for one instrument: bids and asks, price-time priority.
//!
//! Each side is a `BTreeMap` of price levels; each level is a FIFO queue.
//! Orders arrive in sequence-id order, so FIFO within a level is the same as
//! lowest-sequence-first. Best bid is the highest price, best ask the lowest.

use std::collections::{BTreeMap, HashMap, VecDeque};

use rust_decimal::Decimal;

use crate::types::{AgentId, OrderId, Side};

/// A resting limit order. Quantity is strictly positive while on the book.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestingOrder {
    pub order_id: OrderId,
    pub owner: AgentId,
    pub quantity: Decimal,
}

/// One step of liquidity taken from the best resting order on a side.
#[derive(Clone, Copy, Debug)]
pub struct Fill {
    pub order_id: OrderId,
    pub owner: AgentId,
    /// The resting order's price (the trade price).
    pub price: Decimal,
    pub quantity: Decimal,
    /// True if the resting order was exhausted and removed.
    pub resting_exhausted: bool,
}

/// Single-instrument order book.
#[derive(Debug, Default)]
pub struct OrderBook {
    bids: BTreeMap<Decimal, VecDeque<RestingOrder>>,
    asks: BTreeMap<Decimal, VecDeque<RestingOrder>>,
    /// (side, price) by id, for cancel.
    orders: HashMap<OrderId, (Side, Decimal)>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn side(&self, side: Side) -> &BTreeMap<Decimal, VecDeque<RestingOrder>> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BTreeMap<Decimal, VecDeque<RestingOrder>> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Best bid price (None if empty).
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.keys().next_back().copied()
    }

    /// Best ask price (None if empty).
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.keys().next().copied()
    }

    /// Best price on the given side.
    pub fn best_price(&self, side: Side) -> Option<Decimal> {
        match side {
            Side::Buy => self.best_bid(),
            Side::Sell => self.best_ask(),
        }
    }

    /// Rest a limit order at the back of its price level.
    pub fn rest(&mut self, side: Side, price: Decimal, order: RestingOrder) {
        debug_assert!(order.quantity > Decimal::ZERO);
        self.orders.insert(order.order_id, (side, price));
        self.side_mut(side)
            .entry(price)
            .or_default()
            .push_back(order);
    }

    /// Take up to `quantity` from the single best resting order on `side`.
    ///
    /// Removes the resting order when it is exhausted, and the level when it
    /// empties, so no zero-quantity order is ever observable. Returns `None`
    /// when the side is empty.
    pub fn fill_best(&mut self, side: Side, quantity: Decimal) -> Option<Fill> {
        let price = self.best_price(side)?;
        let level = self.side_mut(side).get_mut(&price)?;
        let resting = level.front_mut()?;

        let fill_qty = quantity.min(resting.quantity);
        resting.quantity -= fill_qty;
        let fill = Fill {
            order_id: resting.order_id,
            owner: resting.owner,
            price,
            quantity: fill_qty,
            resting_exhausted: resting.quantity == Decimal::ZERO,
        };
        if fill.resting_exhausted {
            level.pop_front();
            let level_empty = level.is_empty();
            self.orders.remove(&fill.order_id);
            if level_empty {
                self.side_mut(side).remove(&price);
            }
        }
        Some(fill)
    }

    /// Remove a resting order by id. Returns false if unknown (already
    /// filled or never rested).
    pub fn cancel(&mut self, order_id: OrderId) -> bool {
        let Some((side, price)) = self.orders.remove(&order_id) else {
            return false;
        };
        let level = self.side_mut(side);
        if let Some(queue) = level.get_mut(&price) {
            queue.retain(|o| o.order_id != order_id);
            if queue.is_empty() {
                level.remove(&price);
            }
        }
        true
    }

    /// Number of resting orders across both sides.
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Total resting quantity on one side.
    pub fn resting_quantity(&self, side: Side) -> Decimal {
        self.side(side)
            .values()
            .flatten()
            .map(|o| o.quantity)
            .sum()
    }

    /// Resting orders on one side in matching priority order: best price
    /// first, FIFO within a level. Each entry is (price, order).
    pub fn orders_in_priority(&self, side: Side) -> Vec<(Decimal, RestingOrder)> {
        let levels = self.side(side);
        let mut out = Vec::new();
        match side {
            Side::Buy => {
                for (price, queue) in levels.iter().rev() {
                    out.extend(queue.iter().map(|o| (*price, *o)));
                }
            }
            Side::Sell => {
                for (price, queue) in levels.iter() {
                    out.extend(queue.iter().map(|o| (*price, *o)));
                }
            }
        }
        out
    }
}
