//! Single-entry matching engine facade.
//!
//! Owns the order book, the sequence-id counter, and the append-only trade
//! tape. Collaborators (agents, recorders) go through [`MatchingEngine::process`]
//! and [`MatchingEngine::l1_snapshot`]; they never touch the book directly.

use log::{debug, trace};
use rust_decimal::Decimal;

use crate::error::{EngineError, InvalidOrder};
use crate::matching::match_order;
use crate::order_book::OrderBook;
use crate::types::{L1Snapshot, Order, OrderForm, OrderId, Trade};

/// Outcome of processing one order.
#[derive(Clone, Debug)]
pub struct Submission {
    /// Sequence id the engine stamped on the order.
    pub order_id: OrderId,
    /// Trades generated, in execution order. Possibly empty.
    pub trades: Vec<Trade>,
    /// Quantity left resting on the book. Zero for market orders and full
    /// fills.
    pub resting_quantity: Decimal,
}

/// Price-time priority matching engine for one instrument.
///
/// Replaying an identical ordered stream of [`MatchingEngine::process`]
/// calls against a fresh engine reproduces an identical trade tape; that
/// determinism is the primary correctness property of the simulator.
#[derive(Debug, Default)]
pub struct MatchingEngine {
    book: OrderBook,
    tape: Vec<Trade>,
    next_order_id: u64,
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one order: validate, assign a sequence id, match, and rest
    /// any limit remainder.
    ///
    /// Rejections (`price` present and negative, or `quantity <= 0`) happen
    /// before any matching attempt and leave the engine untouched.
    pub fn process(&mut self, form: OrderForm) -> Result<Submission, EngineError> {
        if let Some(price) = form.price {
            if price < Decimal::ZERO {
                return Err(InvalidOrder::NegativePrice(price).into());
            }
        }
        if form.quantity <= Decimal::ZERO {
            return Err(InvalidOrder::NonPositiveQuantity(form.quantity).into());
        }

        let order_id = OrderId(self.next_order_id);
        self.next_order_id += 1;
        trace!(
            "order accepted order_id={} side={:?} quantity={} price={:?} owner={}",
            order_id.0,
            form.side,
            form.quantity,
            form.price,
            form.owner.0
        );

        let mut order = Order {
            order_id,
            side: form.side,
            price: form.price,
            quantity: form.quantity,
            owner: form.owner,
            timestamp: form.timestamp,
        };
        let trades = match_order(&mut self.book, &mut order);
        for trade in &trades {
            debug!(
                "trade price={} quantity={} buyer={} seller={} t={}",
                trade.price, trade.quantity, trade.buyer.0, trade.seller.0, trade.timestamp
            );
        }
        self.tape.extend(trades.iter().cloned());

        // Market remainders were dropped by the matcher; only a limit
        // remainder is still on the book.
        let resting_quantity = if form.is_market() {
            Decimal::ZERO
        } else {
            order.quantity
        };
        Ok(Submission {
            order_id,
            trades,
            resting_quantity,
        })
    }

    /// Best bid and best ask. O(1) against the book's ordered levels.
    pub fn l1_snapshot(&self) -> L1Snapshot {
        L1Snapshot {
            best_bid: self.book.best_bid(),
            best_ask: self.book.best_ask(),
        }
    }

    /// Cancel a resting order. Returns false if it is unknown, already
    /// filled, or was a market order (market orders never rest).
    pub fn cancel(&mut self, order_id: OrderId) -> bool {
        let removed = self.book.cancel(order_id);
        if removed {
            trace!("order canceled order_id={}", order_id.0);
        }
        removed
    }

    /// The append-only trade tape, in execution order.
    pub fn trades(&self) -> &[Trade] {
        &self.tape
    }

    /// Read access to the resting book, for recorders and invariant checks.
    pub fn book(&self) -> &OrderBook {
        &self.book
    }
}
