//! Configuration layering for the service: built-in defaults, then an
//! optional JSON file, then flags / environment variables.

use anyhow::Context;
use clap::Parser;
use desk_engine::SimConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "desk-api", about = "Synthetic collectibles trading desk simulation")]
pub struct Args {
    #[arg(long, env = "DESK_BIND", default_value = "127.0.0.1:8787")]
    pub bind: SocketAddr,
    /// JSON file with `SimConfig` overrides.
    #[arg(long, env = "DESK_CONFIG")]
    pub config: Option<PathBuf>,
    /// Fixed seed for a reproducible feed.
    #[arg(long, env = "DESK_SEED")]
    pub seed: Option<u64>,
    #[arg(long, env = "DESK_TICK_MS")]
    pub tick_ms: Option<u64>,
    #[arg(long, env = "DESK_STARTING_CASH")]
    pub starting_cash: Option<Decimal>,
    /// Directory of presentation assets served on unmatched paths.
    #[arg(long, env = "DESK_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

impl Args {
    pub fn sim_config(&self) -> anyhow::Result<SimConfig> {
        let mut cfg = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                SimConfig::from_json_str(&raw).with_context(|| format!("parsing config {}", path.display()))?
            }
            None => SimConfig::default(),
        };
        if let Some(ms) = self.tick_ms {
            cfg.tick_interval_ms = ms;
        }
        if let Some(cash) = self.starting_cash {
            cfg.starting_cash = cash;
        }
        cfg.validate().context("invalid simulation config")?;
        Ok(cfg)
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
