//! Simulation tunables. Every constant the desk uses lives here so the
//! service layer can override it from a file or the command line.

use crate::{price, DeskError, DeskResult, Product};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub starting_cash: Decimal,
    /// Most recent price points kept in the series.
    pub retention_window: usize,
    /// Points generated from `base_price` before live ticking starts.
    pub seed_points: usize,
    pub base_price: Decimal,
    pub orderbook_depth: usize,
    pub tick_interval_ms: u64,
    /// Drift per tick is uniform in `[-drift_bound, +drift_bound]`.
    pub drift_bound: Decimal,
    pub spread_coefficient: Decimal,
    pub min_price: Decimal,
    pub price_decimals: u32,
    pub level_qty_min: u64,
    pub level_qty_max: u64,
    pub products: Vec<Product>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            starting_cash: dec!(10000),
            retention_window: 120,
            seed_points: 60,
            base_price: dec!(100.00),
            orderbook_depth: 8,
            tick_interval_ms: 1_000,
            drift_bound: dec!(0.75),
            spread_coefficient: dec!(0.01),
            min_price: dec!(1.00),
            price_decimals: 2,
            level_qty_min: 1,
            level_qty_max: 5,
            products: default_products(),
        }
    }
}

/// Smallest spread coefficient accepted.
pub const MIN_SPREAD_COEFFICIENT: Decimal = dec!(0.000001);

/// Smallest distance between adjacent ladder levels at the price floor.
/// Below this the level offsets lose precision and ladders stop being strict.
pub const MIN_LEVEL_STEP: Decimal = dec!(0.000000000001);

fn default_products() -> Vec<Product> {
    [
        ("CHZ-1ED-PSA10", "Charizard 1st Edition PSA 10"),
        ("JORDAN-86-FLEER", "1986 Fleer Michael Jordan RC"),
        ("MTG-BLACK-LOTUS", "Alpha Black Lotus BGS 9"),
    ]
    .into_iter()
    .map(|(id, name)| Product { id: id.into(), name: name.into() })
    .collect()
}

impl SimConfig {
    pub fn from_json_str(raw: &str) -> DeskResult<Self> {
        let cfg: SimConfig = serde_json::from_str(raw)
            .map_err(|e| DeskError::invalid(format!("config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn tick_interval(&self) -> Duration { Duration::from_millis(self.tick_interval_ms) }

    pub fn validate(&self) -> DeskResult<()> {
        if self.retention_window == 0 {
            return Err(DeskError::invalid("retention_window must be at least 1"));
        }
        if self.tick_interval_ms == 0 {
            return Err(DeskError::invalid("tick_interval_ms must be positive"));
        }
        if self.min_price <= Decimal::ZERO {
            return Err(DeskError::invalid("min_price must be positive"));
        }
        if self.base_price < self.min_price {
            return Err(DeskError::invalid("base_price must be at least min_price"));
        }
        if self.drift_bound < Decimal::ZERO {
            return Err(DeskError::invalid("drift_bound must not be negative"));
        }
        if self.price_decimals > 8 {
            return Err(DeskError::invalid("price_decimals must be at most 8"));
        }
        price::drift_steps(self.drift_bound, self.price_decimals)?;
        if self.spread_coefficient < MIN_SPREAD_COEFFICIENT {
            return Err(DeskError::invalid(format!(
                "spread_coefficient must be at least {MIN_SPREAD_COEFFICIENT}"
            )));
        }
        let floor_step = self
            .min_price
            .checked_mul(self.spread_coefficient)
            .map(|v| v / Decimal::TWO)
            .unwrap_or(Decimal::ZERO);
        if floor_step < MIN_LEVEL_STEP {
            return Err(DeskError::invalid(format!(
                "ladder step at the price floor ({floor_step}) is below {MIN_LEVEL_STEP}"
            )));
        }
        if self.starting_cash < Decimal::ZERO {
            return Err(DeskError::invalid("starting_cash must not be negative"));
        }
        if self.level_qty_min == 0 || self.level_qty_min > self.level_qty_max {
            return Err(DeskError::invalid("level quantity range must be 1 <= min <= max"));
        }
        if self.products.is_empty() {
            return Err(DeskError::invalid("product catalog is empty"));
        }
        let mut seen = HashSet::new();
        for p in &self.products {
            if !seen.insert(p.id.as_str()) {
                return Err(DeskError::invalid(format!("duplicate product id {}", p.id)));
            }
        }
        Ok(())
    }
}
