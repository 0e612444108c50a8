//! Synthetic order stream generator.
//!
//! Deterministic, configurable stream of admission-valid orders for replay
//! tests, demos, and benchmarks. Same seed ⇒ same sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::types::{Market, Order, Side, ROUND_LOT};

/// Configuration for the synthetic order generator. Price bounds are in
/// cents (two-decimal ticks); both bounds are inclusive.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// RNG seed. Same seed ⇒ same order stream.
    pub seed: u64,
    /// Number of orders produced by [`Generator::all_orders`].
    pub num_orders: usize,
    /// Securities drawn uniformly for each order.
    pub security_ids: Vec<String>,
    /// Probability of Buy (0.0..=1.0). Sell otherwise.
    pub buy_ratio: f64,
    /// Probability that a SELL is odd-lot. Buys are always round-lot.
    pub odd_lot_ratio: f64,
    pub price_min_cents: i64,
    pub price_max_cents: i64,
    /// Round-lot orders carry 1..=max_lots lots.
    pub max_lots: u32,
    /// Number of distinct shareholders (SH001..).
    pub num_shareholders: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            num_orders: 1000,
            security_ids: vec!["600030".into(), "000001".into()],
            buy_ratio: 0.5,
            odd_lot_ratio: 0.3,
            price_min_cents: 950,
            price_max_cents: 1050,
            max_lots: 10,
            num_shareholders: 8,
        }
    }
}

/// Deterministic order stream. Create with [`Generator::new`]; pull orders
/// with [`Generator::next_order`] or collect with [`Generator::all_orders`].
pub struct Generator {
    rng: StdRng,
    config: GeneratorConfig,
    next_cl_order_id: u64,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            rng,
            config,
            next_cl_order_id: 1,
        }
    }

    /// Generates the next order. Advances the internal state (id, RNG).
    pub fn next_order(&mut self) -> Order {
        let cl_order_id = self.next_cl_order_id.to_string();
        self.next_cl_order_id += 1;
        let side = if self.rng.gen_bool(self.config.buy_ratio) {
            Side::Buy
        } else {
            Side::Sell
        };
        let qty = if side == Side::Sell && self.rng.gen_bool(self.config.odd_lot_ratio) {
            self.rng.gen_range(1..ROUND_LOT)
        } else {
            self.rng.gen_range(1..=self.config.max_lots) * ROUND_LOT
        };
        let cents = self
            .rng
            .gen_range(self.config.price_min_cents..=self.config.price_max_cents);
        let security_idx = self.rng.gen_range(0..self.config.security_ids.len());
        let security = self.config.security_ids[security_idx].clone();
        let holder = self.rng.gen_range(1..=self.config.num_shareholders);
        Order {
            cl_order_id,
            market: Market::Xshg,
            security_id: security,
            side,
            price: Decimal::new(cents, 2),
            qty,
            shareholder_id: format!("SH{:03}", holder),
        }
    }

    /// Collects the configured number of orders.
    pub fn all_orders(mut self) -> Vec<Order> {
        let n = self.config.num_orders;
        (0..n).map(|_| self.next_order()).collect()
    }
}
