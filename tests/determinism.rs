//! Replay reproducibility: the same ordered input always yields the same
//! trade tape, and the same scenario config always yields the same report.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use lobsim::market::{run_scenario, SimConfig};
use lobsim::{AgentId, MatchingEngine, OrderForm, Side, Trade};

fn random_form(rng: &mut StdRng, step: u64) -> OrderForm {
    let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
    let quantity = Decimal::from(rng.gen_range(1..=50));
    let owner = AgentId(rng.gen_range(0..20));
    let timestamp = Decimal::from(step);
    if rng.gen_bool(0.8) {
        let price = Decimal::new(rng.gen_range(9500..=10500), 2);
        OrderForm::limit(side, price, quantity, owner, timestamp)
    } else {
        OrderForm::market(side, quantity, owner, timestamp)
    }
}

fn replay(seed: u64, n: u64) -> Vec<Trade> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut engine = MatchingEngine::new();
    for step in 0..n {
        engine
            .process(random_form(&mut rng, step))
            .expect("generated orders are valid");
    }
    engine.trades().to_vec()
}

#[test]
fn identical_order_streams_produce_identical_tapes() {
    let first = replay(42, 5000);
    let second = replay(42, 5000);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn different_seeds_produce_different_tapes() {
    // Not a hard guarantee, but with 5000 orders a collision would point at
    // a seeding bug.
    assert_ne!(replay(1, 5000), replay(2, 5000));
}

#[test]
fn identical_configs_produce_identical_reports() {
    let config = SimConfig {
        seed: 1234,
        num_noise: 20,
        num_market_makers: 4,
        num_momentum: 4,
        horizon: Decimal::from(100),
        ..SimConfig::default()
    };
    let first = run_scenario(&config).expect("scenario runs");
    let second = run_scenario(&config).expect("scenario runs");
    assert!(!first.trades.is_empty());
    assert_eq!(first.trades, second.trades);
    assert_eq!(first.quotes, second.quotes);
    assert_eq!(first.final_snapshot, second.final_snapshot);
    assert_eq!(first.accounts, second.accounts);
}

#[test]
fn seed_changes_the_scenario() {
    let base = SimConfig {
        num_noise: 20,
        num_market_makers: 4,
        num_momentum: 4,
        horizon: Decimal::from(100),
        ..SimConfig::default()
    };
    let a = run_scenario(&SimConfig { seed: 1, ..base.clone() }).expect("scenario runs");
    let b = run_scenario(&SimConfig { seed: 2, ..base }).expect("scenario runs");
    assert_ne!(a.trades, b.trades);
}
