use desk_engine::Simulation;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

pub type DeskSim = Simulation<StdRng>;

/// Every tick and every ledger operation serialises on this one lock.
#[derive(Clone)]
pub struct AppState {
    sim: Arc<Mutex<DeskSim>>,
}

impl AppState {
    pub fn new(sim: DeskSim) -> Self {
        Self { sim: Arc::new(Mutex::new(sim)) }
    }

    /// Never held across an await point.
    pub fn lock(&self) -> MutexGuard<'_, DeskSim> {
        match self.sim.lock() {
            Ok(g) => g,
            Err(e) => {
                warn!(target: "desk", "Recovered from poisoned mutex: simulation");
                e.into_inner()
            }
        }
    }

    pub fn with<T>(&self, f: impl FnOnce(&mut DeskSim) -> T) -> T {
        f(&mut self.lock())
    }
}
