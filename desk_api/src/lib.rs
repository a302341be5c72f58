//! Runtime shell around `desk_engine`: the repeating simulation clock, the
//! shared state lock, and the local HTTP/WebSocket surface a presentation
//! layer reads snapshots from.

pub mod api_types;
pub mod clock;
pub mod routes;
pub mod settings;
pub mod state;
