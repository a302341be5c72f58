use crate::api_types::{ApiError, PlaceOrderReq, PricesResp, ProductsResp, SelectProductReq};
use crate::state::{AppState, DeskSim};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use desk_engine::{LedgerSnapshot, Order, OrderId, Orderbook, Product, SimulationSnapshot, Timestamp};
use std::time::Duration;
use tracing::debug;

const WS_POLL: Duration = Duration::from_millis(250);

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/state", get(get_state))
        .route("/prices", get(get_prices))
        .route("/orderbook", get(get_orderbook))
        .route("/ledger", get(get_ledger))
        .route("/products", get(get_products))
        .route("/product", post(select_product))
        .route("/orders", post(place_order))
        .route("/orders/:id/close", post(close_position))
        .route("/ws", get(ws))
        .with_state(state)
}

async fn get_state(State(state): State<AppState>) -> Json<SimulationSnapshot> {
    Json(state.lock().snapshot())
}

async fn get_prices(State(state): State<AppState>) -> Json<PricesResp> {
    let sim = state.lock();
    Json(PricesResp { product: sim.selected_product().id.clone(), prices: sim.series().to_vec() })
}

async fn get_orderbook(State(state): State<AppState>) -> Json<Orderbook> {
    Json(state.lock().orderbook().clone())
}

async fn get_ledger(State(state): State<AppState>) -> Json<LedgerSnapshot> {
    Json(state.lock().ledger().snapshot())
}

async fn get_products(State(state): State<AppState>) -> Json<ProductsResp> {
    let sim = state.lock();
    Json(ProductsResp { selected: sim.selected_product().id.clone(), products: sim.products().to_vec() })
}

async fn select_product(
    State(state): State<AppState>,
    payload: Result<Json<SelectProductReq>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Json(req) = payload?;
    let product = state.with(|sim| sim.select_product(&req.id).cloned())?;
    Ok(Json(product))
}

async fn place_order(
    State(state): State<AppState>,
    payload: Result<Json<PlaceOrderReq>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let Json(req) = payload?;
    let order_req = req.to_request()?;
    let order = state.with(|sim| sim.place_order(&order_req))?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn close_position(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Order>, ApiError> {
    let Path(id) = id?;
    let order = state.with(|sim| sim.close_position(OrderId(id)))?;
    Ok(Json(order))
}

async fn ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(|socket| async move { handle_ws(state, socket).await })
}

/// The message to push if the tick sequence moved past `last_ts`.
/// The first call always yields one.
pub(crate) fn tick_event(sim: &DeskSim, last_ts: Option<Timestamp>) -> Option<(Timestamp, serde_json::Value)> {
    if last_ts == Some(sim.now()) {
        return None;
    }
    let snap = sim.snapshot();
    Some((snap.ts, serde_json::json!({ "event": "tick", "snapshot": snap })))
}

async fn handle_ws(state: AppState, mut socket: WebSocket) {
    let mut last_ts: Option<Timestamp> = None;
    loop {
        let event = tick_event(&state.lock(), last_ts);
        if let Some((ts, msg)) = event {
            last_ts = Some(ts);
            if socket.send(Message::Text(msg.to_string())).await.is_err() {
                debug!(target: "desk", "ws client went away");
                break;
            }
        }
        tokio::time::sleep(WS_POLL).await;
    }
}
