use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GeneratorConfig;
use crate::order::Order;
use crate::types::{Nanos, Price, Side};

/// Synthetic order flow: uniform price within a band around a base price,
/// uniform quantity in an inclusive range, a fair coin for the side, and
/// timestamps uniform over a supplied window.
pub struct OrderFlowGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl OrderFlowGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic variant for tests and benches.
    pub fn with_seed(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Ids are assigned 1..=count in generation order, then the batch is
    /// sorted by timestamp, so ids are not monotone in the output.
    pub fn generate(&mut self, count: usize, window: (Nanos, Nanos)) -> Vec<Order> {
        let lo = self.config.base_price * (1.0 - self.config.price_volatility);
        let hi = self.config.base_price * (1.0 + self.config.price_volatility);
        let (start, end) = window;

        let mut orders = Vec::with_capacity(count);
        for i in 0..count {
            let price = Price::from_decimal(self.rng.gen_range(lo..hi)).unwrap_or(Price::ZERO);
            let quantity = self
                .rng
                .gen_range(self.config.min_quantity..=self.config.max_quantity);
            let side = if self.rng.gen_bool(0.5) { Side::Bid } else { Side::Ask };
            let arrival_time = self.rng.gen_range(start..=end);
            orders.push(Order::new(i as u64 + 1, price, quantity, side, arrival_time));
        }
        orders.sort_by_key(|order| order.arrival_time);
        orders
    }
}
