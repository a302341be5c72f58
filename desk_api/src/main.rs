use anyhow::Context;
use clap::Parser;
use desk_api::clock::SimulationClock;
use desk_api::routes;
use desk_api::settings::Args;
use desk_api::state::AppState;
use desk_engine::Simulation;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let cfg = args.sim_config()?;
    let period = cfg.tick_interval();
    let sim = Simulation::new(cfg, args.rng()).context("building simulation")?;
    let state = AppState::new(sim);
    let mut clock = SimulationClock::start(state.clone(), period);

    let mut app = routes::build_router(state);
    if let Some(dir) = &args.static_dir {
        info!(target: "desk", dir = %dir.display(), "serving presentation assets");
        app = app.fallback_service(ServeDir::new(dir));
    }
    let app = app.layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(args.bind).await.with_context(|| format!("binding {}", args.bind))?;
    info!(target: "desk", "Listening on {}", args.bind);
    let served = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await;

    clock.stop().await;
    served.context("server crashed")?;
    info!(target: "desk", "shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(target: "desk", error = %e, "ctrl-c handler failed; shutting down");
    }
}
