//! Time-series capture: level-1 quote snapshots and CSV export.
//!
//! The quote recorder samples the book once per market step; the CSV
//! writers serialize the captured rows and the trade tape for offline
//! analysis.

use std::io;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{L1Snapshot, SimTime, Trade};

/// One sampled quote: the level-1 state at a point on the simulation clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct QuoteRow {
    pub timestamp: SimTime,
    pub best_bid: Option<Decimal>,
    pub best_ask: Option<Decimal>,
    pub mid: Option<Decimal>,
    pub spread: Option<Decimal>,
}

/// Append-only series of [`QuoteRow`]s in sampling order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuoteRecorder {
    rows: Vec<QuoteRow>,
}

impl QuoteRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, time: SimTime, snapshot: &L1Snapshot) {
        self.rows.push(QuoteRow {
            timestamp: time,
            best_bid: snapshot.best_bid,
            best_ask: snapshot.best_ask,
            mid: snapshot.mid(),
            spread: snapshot.spread(),
        });
    }

    pub fn rows(&self) -> &[QuoteRow] {
        &self.rows
    }

    /// Average quoted spread over rows where both sides were quoted.
    pub fn average_spread(&self) -> Option<Decimal> {
        let spreads: Vec<Decimal> = self.rows.iter().filter_map(|r| r.spread).collect();
        if spreads.is_empty() {
            return None;
        }
        let total: Decimal = spreads.iter().sum();
        Some(total / Decimal::from(spreads.len() as u64))
    }
}

/// Write the quote series as CSV with a header row.
pub fn write_quotes_csv<W: io::Write>(writer: W, rows: &[QuoteRow]) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    for row in rows {
        out.serialize(row)?;
    }
    out.flush()?;
    Ok(())
}

/// Write the trade tape as CSV with a header row.
pub fn write_trades_csv<W: io::Write>(writer: W, trades: &[Trade]) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    for trade in trades {
        out.serialize(trade)?;
    }
    out.flush()?;
    Ok(())
}
