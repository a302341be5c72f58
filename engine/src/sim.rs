//! The simulation owns every piece of mutable desk state together with its
//! random source. One tick runs price -> series -> book -> mark, in that
//! order; user operations read the mid from the latest tick.

use crate::book::OrderbookSynthesizer;
use crate::ledger::{LedgerSnapshot, PositionLedger};
use crate::price::{PriceGenerator, PriceSeries};
use crate::{
    DeskError, DeskResult, Order, OrderId, OrderRequest, Orderbook, PricePoint, Product, SimConfig, Timestamp,
};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TickReport {
    pub ts: Timestamp,
    pub mid: Decimal,
    pub evicted: Option<PricePoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationSnapshot {
    pub product: Product,
    pub ts: Timestamp,
    pub mid: Decimal,
    pub prices: Vec<PricePoint>,
    pub orderbook: Orderbook,
    pub ledger: LedgerSnapshot,
}

pub struct Simulation<R> {
    config: SimConfig,
    generator: PriceGenerator,
    synthesizer: OrderbookSynthesizer,
    series: PriceSeries,
    book: Orderbook,
    ledger: PositionLedger,
    selected: usize,
    last_ts: Timestamp,
    rng: R,
}

impl<R: Rng> Simulation<R> {
    pub fn new(config: SimConfig, mut rng: R) -> DeskResult<Self> {
        config.validate()?;
        let generator = PriceGenerator::from_config(&config)?;
        let synthesizer = OrderbookSynthesizer::from_config(&config);
        let seeded = generator.seed_series(config.base_price, config.seed_points, &mut rng);
        let last_ts = seeded.last().map(|p| p.ts).unwrap_or_default();
        let series = PriceSeries::with_points(config.retention_window, seeded);
        let mid = series.latest().map(|p| p.price).unwrap_or(config.base_price);
        let book = synthesizer.synthesize(mid, &mut rng);
        let ledger = PositionLedger::new(config.starting_cash);
        info!(target: "desk", %mid, points = series.len(), "simulation seeded");
        Ok(Self { config, generator, synthesizer, series, book, ledger, selected: 0, last_ts, rng })
    }

    pub fn tick(&mut self) -> TickReport {
        let ts = if self.series.is_empty() { self.last_ts } else { self.last_ts.next() };
        let prev = self.mid();
        let mid = self.generator.next_price(prev, &mut self.rng);
        let evicted = self.series.push(PricePoint { ts, price: mid });
        self.book = self.synthesizer.synthesize(mid, &mut self.rng);
        self.ledger.mark_to_market(mid);
        self.last_ts = ts;
        debug!(target: "desk", ts = ts.0, %mid, "tick");
        TickReport { ts, mid, evicted }
    }

    pub fn place_order(&mut self, req: &OrderRequest) -> DeskResult<Order> {
        let mid = self.mid();
        self.ledger
            .place_order(req, mid, self.last_ts)
            .inspect_err(|e| warn!(target: "desk", error = %e, "order rejected"))
    }

    pub fn close_position(&mut self, id: OrderId) -> DeskResult<Order> {
        let mid = self.mid();
        self.ledger
            .close_position(id, mid)
            .inspect_err(|e| warn!(target: "desk", error = %e, "close rejected"))
    }

    /// Changes which product the shared feed is displayed under.
    pub fn select_product(&mut self, id: &str) -> DeskResult<&Product> {
        let idx = self
            .config
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DeskError::ProductNotFound(id.to_string()))?;
        self.selected = idx;
        info!(target: "desk", product = id, "product selected");
        Ok(&self.config.products[idx])
    }
}

impl<R> Simulation<R> {
    pub fn mid(&self) -> Decimal {
        self.series.latest().map(|p| p.price).unwrap_or(self.config.base_price)
    }

    pub fn now(&self) -> Timestamp { self.last_ts }
    pub fn config(&self) -> &SimConfig { &self.config }
    pub fn series(&self) -> &PriceSeries { &self.series }
    pub fn orderbook(&self) -> &Orderbook { &self.book }
    pub fn ledger(&self) -> &PositionLedger { &self.ledger }
    pub fn products(&self) -> &[Product] { &self.config.products }
    pub fn selected_product(&self) -> &Product { &self.config.products[self.selected] }

    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            product: self.selected_product().clone(),
            ts: self.last_ts,
            mid: self.mid(),
            prices: self.series.to_vec(),
            orderbook: self.book.clone(),
            ledger: self.ledger.snapshot(),
        }
    }
}
