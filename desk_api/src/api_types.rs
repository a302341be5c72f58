use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use desk_engine::{DeskError, ErrorKind, OrderKind, OrderRequest, PricePoint, Product, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Deserialize)]
pub struct PlaceOrderReq {
    pub side: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    pub qty: i64,
}

impl PlaceOrderReq {
    pub fn to_request(&self) -> Result<OrderRequest, ApiError> {
        let side = if self.side.eq_ignore_ascii_case("buy") {
            Side::Buy
        } else if self.side.eq_ignore_ascii_case("sell") {
            Side::Sell
        } else {
            return Err(DeskError::InvalidInput(format!("unknown side {:?}", self.side)).into());
        };
        let kind = match self.kind.as_deref() {
            None => OrderKind::Market,
            Some(k) if k.eq_ignore_ascii_case("market") => OrderKind::Market,
            Some(k) if k.eq_ignore_ascii_case("limit") => OrderKind::Limit,
            Some(k) => return Err(DeskError::InvalidInput(format!("unknown order kind {k:?}")).into()),
        };
        Ok(OrderRequest { side, kind, price: self.price, qty: self.qty })
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectProductReq {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PricesResp {
    pub product: String,
    pub prices: Vec<PricePoint>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductsResp {
    pub selected: String,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResp {
    pub error: String,
    pub kind: ErrorKind,
}

#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub DeskError);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(DeskError::InvalidInput(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError(DeskError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = match kind {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidState => StatusCode::CONFLICT,
        };
        (status, Json(ErrorResp { error: self.0.to_string(), kind })).into_response()
    }
}
