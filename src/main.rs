//! Scenario runner. Configuration comes from environment variables so runs
//! are easy to script:
//!
//! ```sh
//! SEED=7 HORIZON=600 NUM_NOISE=120 TRADES_CSV=trades.csv lobsim
//! ```

use std::env;
use std::error::Error;
use std::fs::File;
use std::process;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use lobsim::market::{run_scenario, SimConfig};
use lobsim::recorder::{write_quotes_csv, write_trades_csv};

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("ignoring unparseable {key}={raw}");
                default
            }
        },
        Err(_) => default,
    }
}

fn config_from_env() -> SimConfig {
    let defaults = SimConfig::default();
    SimConfig {
        seed: env_parse("SEED", defaults.seed),
        num_noise: env_parse("NUM_NOISE", defaults.num_noise),
        num_market_makers: env_parse("NUM_MARKET_MAKERS", defaults.num_market_makers),
        num_momentum: env_parse("NUM_MOMENTUM", defaults.num_momentum),
        horizon: env_parse("HORIZON", defaults.horizon),
        step_interval: env_parse("STEP_INTERVAL", defaults.step_interval),
        wake_probability: env_parse("WAKE_PROBABILITY", defaults.wake_probability),
        fair_value_start: env_parse("FAIR_VALUE_START", defaults.fair_value_start),
        fair_value_vol_ticks: env_parse("FAIR_VALUE_VOL_TICKS", defaults.fair_value_vol_ticks),
        initial_cash: env_parse("INITIAL_CASH", defaults.initial_cash),
    }
}

#[derive(Serialize)]
struct Summary {
    seed: u64,
    horizon: Decimal,
    agents: usize,
    trades: usize,
    total_volume: Decimal,
    average_spread: Option<Decimal>,
    final_best_bid: Option<Decimal>,
    final_best_ask: Option<Decimal>,
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = config_from_env();
    log::info!(
        "running scenario seed={} horizon={} agents={}",
        config.seed,
        config.horizon,
        config.num_noise + config.num_market_makers + config.num_momentum
    );

    let report = run_scenario(&config)?;

    if let Ok(path) = env::var("TRADES_CSV") {
        write_trades_csv(File::create(&path)?, &report.trades)?;
        log::info!("wrote {} trades to {path}", report.trades.len());
    }
    if let Ok(path) = env::var("QUOTES_CSV") {
        write_quotes_csv(File::create(&path)?, &report.quotes)?;
        log::info!("wrote {} quote rows to {path}", report.quotes.len());
    }

    let summary = Summary {
        seed: config.seed,
        horizon: config.horizon,
        agents: report.accounts.len(),
        trades: report.trades.len(),
        total_volume: report.total_volume(),
        average_spread: report.average_spread,
        final_best_bid: report.final_snapshot.best_bid,
        final_best_ask: report.final_snapshot.best_ask,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        process::exit(1);
    }
}
