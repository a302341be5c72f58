use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side { Buy, Sell }

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind { Market, Limit }

/// Logical tick sequence. Only its ordering carries meaning.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn next(self) -> Self { Timestamp(self.0 + 1) }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PricePoint {
    pub ts: Timestamp,
    pub price: Decimal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderbookLevel {
    pub price: Decimal,
    pub qty: u64,
}

/// Bids descending, asks ascending.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Orderbook {
    pub mid: Decimal,
    pub bids: Vec<OrderbookLevel>,
    pub asks: Vec<OrderbookLevel>,
}

impl Orderbook {
    pub fn best_bid(&self) -> Option<&OrderbookLevel> { self.bids.first() }
    pub fn best_ask(&self) -> Option<&OrderbookLevel> { self.asks.first() }
}

/// A user instruction before it is accepted by the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRequest {
    pub side: Side,
    pub kind: OrderKind,
    pub price: Option<Decimal>,
    // signed so that non-positive sizes reach validation instead of failing to parse
    pub qty: i64,
}

impl OrderRequest {
    pub fn market(side: Side, qty: i64) -> Self {
        Self { side, kind: OrderKind::Market, price: None, qty }
    }

    pub fn limit(side: Side, price: Decimal, qty: i64) -> Self {
        Self { side, kind: OrderKind::Limit, price: Some(price), qty }
    }
}

/// An order and, once filled, the position it opened.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    pub kind: OrderKind,
    pub requested_price: Option<Decimal>,
    pub qty: u64,
    pub created_at: Timestamp,
    pub filled: bool,
    pub execution_price: Option<Decimal>,
    pub unrealized_pnl: Decimal,
    pub closed: bool,
    pub close_price: Option<Decimal>,
    pub realized_pnl: Option<Decimal>,
}

impl Order {
    /// Filled and not yet closed.
    pub fn is_open(&self) -> bool { self.filled && !self.closed }
}

/// A catalog entry. Every product is quoted off the one shared feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub name: String,
}
