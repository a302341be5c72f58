//! Simulated mid-price feed.
//!
//! [`PriceGenerator`] is a pure step function over the previous price and a
//! random draw; [`PriceSeries`] is the bounded window the caller accumulates
//! those steps into.

use crate::{DeskError, DeskResult, PricePoint, SimConfig, Timestamp};
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceGenerator {
    /// Drift bound expressed in whole price increments.
    drift_steps: i64,
    min_price: Decimal,
    decimals: u32,
}

/// Number of `10^-decimals` increments in `bound`; must fit an `i64`.
pub fn drift_steps(bound: Decimal, decimals: u32) -> DeskResult<i64> {
    let steps = 10i64
        .checked_pow(decimals)
        .map(Decimal::from)
        .and_then(|scale| bound.abs().checked_mul(scale))
        .and_then(|v| v.trunc().to_i64());
    steps.ok_or_else(|| {
        DeskError::InvalidInput(format!("drift bound {bound} is too large for {decimals} price decimals"))
    })
}

impl PriceGenerator {
    pub fn new(drift_bound: Decimal, min_price: Decimal, decimals: u32) -> DeskResult<Self> {
        Ok(Self { drift_steps: drift_steps(drift_bound, decimals)?, min_price, decimals })
    }

    pub fn from_config(cfg: &SimConfig) -> DeskResult<Self> {
        Self::new(cfg.drift_bound, cfg.min_price, cfg.price_decimals)
    }

    /// Apply a drift to `previous`: rounded, then floored at the minimum price.
    pub fn step(&self, previous: Decimal, drift: Decimal) -> Decimal {
        let next = (previous + drift)
            .round_dp_with_strategy(self.decimals, RoundingStrategy::MidpointAwayFromZero);
        next.max(self.min_price)
    }

    /// Uniform draw over whole price increments in `[-bound, +bound]`.
    pub fn sample_drift<R: Rng + ?Sized>(&self, rng: &mut R) -> Decimal {
        if self.drift_steps == 0 {
            return Decimal::ZERO;
        }
        Decimal::new(rng.random_range(-self.drift_steps..=self.drift_steps), self.decimals)
    }

    pub fn next_price<R: Rng + ?Sized>(&self, previous: Decimal, rng: &mut R) -> Decimal {
        let drift = self.sample_drift(rng);
        self.step(previous, drift)
    }

    /// `n` points drifting from `base`, stamped `0..n`.
    pub fn seed_series<R: Rng + ?Sized>(&self, base: Decimal, n: usize, rng: &mut R) -> Vec<PricePoint> {
        let mut price = base;
        (0..n as u64)
            .map(|i| {
                price = self.next_price(price, rng);
                PricePoint { ts: Timestamp(i), price }
            })
            .collect()
    }
}

/// FIFO window of the most recent price points.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    window: usize,
    points: VecDeque<PricePoint>,
}

impl PriceSeries {
    pub fn new(window: usize) -> Self {
        Self { window: window.max(1), points: VecDeque::with_capacity(window) }
    }

    pub fn with_points(window: usize, points: impl IntoIterator<Item = PricePoint>) -> Self {
        let mut s = Self::new(window);
        for p in points {
            s.push(p);
        }
        s
    }

    /// Append a point; returns the oldest point if the window overflowed.
    pub fn push(&mut self, point: PricePoint) -> Option<PricePoint> {
        self.points.push_back(point);
        let mut evicted = None;
        while self.points.len() > self.window {
            evicted = self.points.pop_front();
        }
        evicted
    }

    pub fn latest(&self) -> Option<&PricePoint> { self.points.back() }
    pub fn oldest(&self) -> Option<&PricePoint> { self.points.front() }
    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }
    pub fn window(&self) -> usize { self.window }
    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> { self.points.iter() }
    pub fn to_vec(&self) -> Vec<PricePoint> { self.points.iter().copied().collect() }
}
