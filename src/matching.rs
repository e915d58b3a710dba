//! Price-time priority matching.
//!
//! [`match_order`] runs one validated order against the book: crosses the
//! opposite side best-first until the order is exhausted, the spread stops
//! crossing, or the opposite side empties; rests any limit remainder. Trades
//! always execute at the resting order's price.

use rust_decimal::Decimal;

use crate::order_book::{OrderBook, RestingOrder};
use crate::types::{Order, Side, Trade};

/// Whether an incoming limit price crosses the best opposite price.
fn crosses(side: Side, limit: Decimal, best_opposite: Decimal) -> bool {
    match side {
        Side::Buy => limit >= best_opposite,
        Side::Sell => limit <= best_opposite,
    }
}

/// Match one order against the book, mutating both.
///
/// The order's quantity is decremented as fills occur. A limit remainder is
/// rested on its own side; a market remainder is dropped (market orders
/// never rest). Returns the trades generated, in execution order.
pub fn match_order(book: &mut OrderBook, order: &mut Order) -> Vec<Trade> {
    let opposite = order.side.opposite();
    let mut trades = Vec::new();

    while order.quantity > Decimal::ZERO {
        let Some(best_price) = book.best_price(opposite) else {
            break;
        };
        if let Some(limit) = order.price {
            if !crosses(order.side, limit, best_price) {
                break;
            }
        }
        let Some(fill) = book.fill_best(opposite, order.quantity) else {
            break;
        };
        order.quantity -= fill.quantity;

        let (buyer, seller, buy_order_id, sell_order_id) = match order.side {
            Side::Buy => (order.owner, fill.owner, order.order_id, fill.order_id),
            Side::Sell => (fill.owner, order.owner, fill.order_id, order.order_id),
        };
        trades.push(Trade {
            price: fill.price,
            quantity: fill.quantity,
            timestamp: order.timestamp,
            buyer,
            seller,
            buy_order_id,
            sell_order_id,
        });
    }

    if order.quantity > Decimal::ZERO {
        if let Some(price) = order.price {
            book.rest(
                order.side,
                price,
                RestingOrder {
                    order_id: order.order_id,
                    owner: order.owner,
                    quantity: order.quantity,
                },
            );
        }
    }

    trades
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgentId, OrderId};

    fn limit(id: u64, side: Side, price: i64, qty: i64, owner: u64) -> Order {
        Order {
            order_id: OrderId(id),
            side,
            price: Some(Decimal::from(price)),
            quantity: Decimal::from(qty),
            owner: AgentId(owner),
            timestamp: Decimal::ZERO,
        }
    }

    fn market(id: u64, side: Side, qty: i64, owner: u64) -> Order {
        Order {
            order_id: OrderId(id),
            side,
            price: None,
            quantity: Decimal::from(qty),
            owner: AgentId(owner),
            timestamp: Decimal::ZERO,
        }
    }

    fn seed_ask(book: &mut OrderBook, id: u64, price: i64, qty: i64, owner: u64) {
        book.rest(
            Side::Sell,
            Decimal::from(price),
            RestingOrder {
                order_id: OrderId(id),
                owner: AgentId(owner),
                quantity: Decimal::from(qty),
            },
        );
    }

    #[test]
    fn limit_with_no_opposite_liquidity_rests() {
        let mut book = OrderBook::new();
        let mut order = limit(1, Side::Buy, 100, 10, 1);
        let trades = match_order(&mut book, &mut order);
        assert!(trades.is_empty());
        assert_eq!(book.best_bid(), Some(Decimal::from(100)));
    }

    #[test]
    fn full_match_at_resting_price() {
        let mut book = OrderBook::new();
        seed_ask(&mut book, 1, 100, 10, 1);
        // Aggressor bids higher than the ask: executes at the resting 100.
        let mut order = limit(2, Side::Buy, 105, 10, 2);
        let trades = match_order(&mut book, &mut order);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, Decimal::from(100));
        assert_eq!(trades[0].quantity, Decimal::from(10));
        assert_eq!(trades[0].buyer, AgentId(2));
        assert_eq!(trades[0].seller, AgentId(1));
        assert_eq!(book.best_ask(), None);
        assert_eq!(book.best_bid(), None, "fully filled aggressor must not rest");
    }

    #[test]
    fn partial_fill_rests_limit_remainder() {
        let mut book = OrderBook::new();
        seed_ask(&mut book, 1, 100, 4, 1);
        let mut order = limit(2, Side::Buy, 100, 10, 2);
        let trades = match_order(&mut book, &mut order);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, Decimal::from(4));
        assert_eq!(book.best_ask(), None);
        assert_eq!(book.best_bid(), Some(Decimal::from(100)));
        assert_eq!(book.resting_quantity(Side::Buy), Decimal::from(6));
    }

    #[test]
    fn uncrossed_spread_stops_matching() {
        let mut book = OrderBook::new();
        seed_ask(&mut book, 1, 101, 10, 1);
        let mut order = limit(2, Side::Buy, 100, 10, 2);
        let trades = match_order(&mut book, &mut order);
        assert!(trades.is_empty());
        assert_eq!(book.best_ask(), Some(Decimal::from(101)));
        assert_eq!(book.best_bid(), Some(Decimal::from(100)));
    }

    #[test]
    fn sweep_walks_levels_in_price_order() {
        let mut book = OrderBook::new();
        seed_ask(&mut book, 1, 101, 10, 1);
        seed_ask(&mut book, 2, 103, 30, 1);
        seed_ask(&mut book, 3, 102, 20, 1);
        let mut order = limit(4, Side::Buy, 103, 60, 2);
        let trades = match_order(&mut book, &mut order);
        let prices: Vec<Decimal> = trades.iter().map(|t| t.price).collect();
        assert_eq!(
            prices,
            vec![Decimal::from(101), Decimal::from(102), Decimal::from(103)]
        );
        assert_eq!(book.best_ask(), None);
    }

    #[test]
    fn market_order_ignores_price_check_and_never_rests() {
        let mut book = OrderBook::new();
        seed_ask(&mut book, 1, 101, 5, 1);
        let mut order = market(2, Side::Buy, 20, 2);
        let trades = match_order(&mut book, &mut order);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, Decimal::from(5));
        // 15 unfilled: dropped, not rested, not an error.
        assert_eq!(book.best_bid(), None);
        assert_eq!(book.best_ask(), None);
    }

    #[test]
    fn market_order_into_empty_book_produces_no_trades() {
        let mut book = OrderBook::new();
        let mut order = market(1, Side::Sell, 10, 1);
        let trades = match_order(&mut book, &mut order);
        assert!(trades.is_empty());
        assert_eq!(book.order_count(), 0);
    }

    #[test]
    fn sell_side_mirror_matches_highest_bid_first() {
        let mut book = OrderBook::new();
        book.rest(
            Side::Buy,
            Decimal::from(99),
            RestingOrder {
                order_id: OrderId(1),
                owner: AgentId(1),
                quantity: Decimal::from(10),
            },
        );
        book.rest(
            Side::Buy,
            Decimal::from(100),
            RestingOrder {
                order_id: OrderId(2),
                owner: AgentId(2),
                quantity: Decimal::from(10),
            },
        );
        let mut order = limit(3, Side::Sell, 99, 15, 3);
        let trades = match_order(&mut book, &mut order);
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].price, Decimal::from(100));
        assert_eq!(trades[0].buyer, AgentId(2));
        assert_eq!(trades[1].price, Decimal::from(99));
        assert_eq!(trades[1].quantity, Decimal::from(5));
    }
}
