use crate::{Orderbook, OrderbookLevel, SimConfig};
use rand::Rng;
use rust_decimal::Decimal;

/// Derives a symmetric bid/ask ladder from a single mid price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderbookSynthesizer {
    pub depth: usize,
    pub spread_coefficient: Decimal,
    pub qty_min: u64,
    pub qty_max: u64,
}

impl OrderbookSynthesizer {
    pub fn from_config(cfg: &SimConfig) -> Self {
        Self {
            depth: cfg.orderbook_depth,
            spread_coefficient: cfg.spread_coefficient,
            qty_min: cfg.level_qty_min,
            qty_max: cfg.level_qty_max,
        }
    }

    pub fn synthesize<R: Rng + ?Sized>(&self, mid: Decimal, rng: &mut R) -> Orderbook {
        self.synthesize_depth(mid, self.depth, rng)
    }

    pub fn synthesize_depth<R: Rng + ?Sized>(&self, mid: Decimal, depth: usize, rng: &mut R) -> Orderbook {
        let half_spread = mid * self.spread_coefficient / Decimal::TWO;
        let (lo, hi) = (self.qty_min.max(1), self.qty_max.max(self.qty_min.max(1)));
        let mut bids = Vec::with_capacity(depth);
        let mut asks = Vec::with_capacity(depth);
        for i in 0..depth {
            let offset = half_spread * Decimal::from(i as u64);
            bids.push(OrderbookLevel { price: mid - offset, qty: rng.random_range(lo..=hi) });
            asks.push(OrderbookLevel { price: mid + offset, qty: rng.random_range(lo..=hi) });
        }
        // ordering is enforced here rather than trusted from the loop above
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));
        Orderbook { mid, bids, asks }
    }
}
