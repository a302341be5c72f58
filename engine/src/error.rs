use crate::OrderId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeskError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("order {0} not found")]
    OrderNotFound(OrderId),
    #[error("product {0} not found")]
    ProductNotFound(String),
    #[error("order {id} cannot be closed: {reason}")]
    InvalidState { id: OrderId, reason: &'static str },
}

/// Coarse classification surfaced to callers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind { InvalidInput, NotFound, InvalidState }

impl DeskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeskError::InvalidInput(_) => ErrorKind::InvalidInput,
            DeskError::OrderNotFound(_) | DeskError::ProductNotFound(_) => ErrorKind::NotFound,
            DeskError::InvalidState { .. } => ErrorKind::InvalidState,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        DeskError::InvalidInput(msg.into())
    }
}

pub type DeskResult<T> = Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_collapse_not_found_variants() {
        assert_eq!(DeskError::OrderNotFound(OrderId(3)).kind(), ErrorKind::NotFound);
        assert_eq!(DeskError::ProductNotFound("x".into()).kind(), ErrorKind::NotFound);
        let e = DeskError::InvalidState { id: OrderId(1), reason: "already closed" };
        assert_eq!(e.kind(), ErrorKind::InvalidState);
        assert_eq!(e.to_string(), "order 1 cannot be closed: already closed");
    }
}
