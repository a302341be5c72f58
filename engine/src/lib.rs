//! Deterministic core of the synthetic collectibles trading desk.
//!
//! A simulated mid-price feed drives a synthetic orderbook and marks the
//! positions held in a single demo ledger. Nothing here performs I/O or
//! spawns tasks; the owner supplies the random source and decides when to
//! tick.

pub mod book;
pub mod config;
pub mod error;
pub mod ledger;
pub mod pnl;
pub mod price;
pub mod sim;
pub mod types;

pub use book::OrderbookSynthesizer;
pub use config::SimConfig;
pub use error::{DeskError, DeskResult, ErrorKind};
pub use ledger::{LedgerSnapshot, PositionLedger};
pub use pnl::{pnl_at, pnl_unrealized, round_money, AccountSummary};
pub use price::{PriceGenerator, PriceSeries};
pub use sim::{Simulation, SimulationSnapshot, TickReport};
pub use types::*;
