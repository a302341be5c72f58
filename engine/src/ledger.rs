//! Order and position book-keeping for a single demo account.
//!
//! Market orders fill immediately at the supplied mid. Limit orders are
//! accepted and recorded but never filled: there is no matching engine behind
//! the synthetic book, so a limit order stays pending for the life of the
//! ledger and cannot be closed.
//!
//! Cash moves only when a position is closed, by exactly its realized PnL.

use crate::pnl::{self, AccountSummary};
use crate::{DeskError, DeskResult, Order, OrderId, OrderKind, OrderRequest, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct PositionLedger {
    cash: Decimal,
    orders: BTreeMap<OrderId, Order>,
    next_id: u64,
}

/// Read-only copy of the ledger; `orders` are most recent first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerSnapshot {
    #[serde(flatten)]
    pub summary: AccountSummary,
    pub orders: Vec<Order>,
}

fn ensure_positive_price(what: &str, price: Decimal) -> DeskResult<()> {
    if price <= Decimal::ZERO {
        return Err(DeskError::invalid(format!("{what} must be positive, got {price}")));
    }
    Ok(())
}

impl PositionLedger {
    pub fn new(starting_cash: Decimal) -> Self {
        Self { cash: pnl::round_money(starting_cash), orders: BTreeMap::new(), next_id: 1 }
    }

    pub fn place_order(&mut self, req: &OrderRequest, mid: Decimal, now: Timestamp) -> DeskResult<Order> {
        if req.qty <= 0 {
            return Err(DeskError::invalid(format!("quantity must be positive, got {}", req.qty)));
        }
        if let Some(p) = req.price {
            ensure_positive_price("price", p)?;
        }
        if req.kind == OrderKind::Limit && req.price.is_none() {
            return Err(DeskError::invalid("limit order requires a price"));
        }
        ensure_positive_price("mid", mid)?;

        let id = OrderId(self.next_id);
        self.next_id += 1;
        let market = req.kind == OrderKind::Market;
        let order = Order {
            id,
            side: req.side,
            kind: req.kind,
            requested_price: req.price,
            qty: req.qty as u64,
            created_at: now,
            filled: market,
            execution_price: market.then_some(mid),
            unrealized_pnl: Decimal::ZERO,
            closed: false,
            close_price: None,
            realized_pnl: None,
        };
        info!(target: "desk", id = %id, side = ?order.side, kind = ?order.kind, qty = order.qty, filled = order.filled, "order placed");
        self.orders.insert(id, order.clone());
        Ok(order)
    }

    pub fn mark_to_market(&mut self, mid: Decimal) {
        let mut marked = 0usize;
        for order in self.orders.values_mut() {
            if let Some(u) = pnl::pnl_unrealized(order, mid) {
                order.unrealized_pnl = u;
                marked += 1;
            }
        }
        debug!(target: "desk", %mid, marked, "marked to market");
    }

    pub fn close_position(&mut self, id: OrderId, mid: Decimal) -> DeskResult<Order> {
        ensure_positive_price("mid", mid)?;
        let order = self.orders.get_mut(&id).ok_or(DeskError::OrderNotFound(id))?;
        if !order.filled {
            return Err(DeskError::InvalidState { id, reason: "order was never filled" });
        }
        if order.closed {
            return Err(DeskError::InvalidState { id, reason: "position already closed" });
        }
        let exec = order
            .execution_price
            .ok_or(DeskError::InvalidState { id, reason: "filled order has no execution price" })?;
        let realized = pnl::pnl_at(order.side, exec, mid, order.qty);

        order.closed = true;
        order.close_price = Some(mid);
        order.realized_pnl = Some(realized);
        order.unrealized_pnl = Decimal::ZERO;
        self.cash = pnl::round_money(self.cash + realized);
        info!(target: "desk", id = %id, %realized, cash = %self.cash, "position closed");
        Ok(order.clone())
    }

    pub fn cash(&self) -> Decimal { self.cash }

    pub fn get(&self, id: OrderId) -> Option<&Order> { self.orders.get(&id) }

    /// History, most recent first.
    pub fn orders(&self) -> impl Iterator<Item = &Order> { self.orders.values().rev() }

    pub fn open_positions(&self) -> impl Iterator<Item = &Order> { self.orders().filter(|o| o.is_open()) }

    pub fn summary(&self) -> AccountSummary { pnl::summarize(self.cash, self.orders.values()) }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot { summary: self.summary(), orders: self.orders().cloned().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, Side};
    use rust_decimal_macros::dec;

    #[test]
    fn market_order_fills_at_mid() {
        let mut l = PositionLedger::new(dec!(10000));
        let o = l.place_order(&OrderRequest::market(Side::Buy, 3), dec!(150), Timestamp(9)).unwrap();
        assert!(o.filled);
        assert_eq!(o.execution_price, Some(dec!(150)));
        assert_eq!(o.created_at, Timestamp(9));
        assert_eq!(o.id, OrderId(1));
    }

    #[test]
    fn limit_order_never_fills() {
        let mut l = PositionLedger::new(dec!(10000));
        let o = l.place_order(&OrderRequest::limit(Side::Sell, dec!(120), 1), dec!(100), Timestamp(0)).unwrap();
        assert!(!o.filled);
        assert_eq!(o.execution_price, None);
        for mid in [dec!(130), dec!(120), dec!(90)] {
            l.mark_to_market(mid);
        }
        let o = l.get(o.id).unwrap();
        assert!(!o.filled);
        assert_eq!(o.unrealized_pnl, Decimal::ZERO);
    }

    #[test]
    fn rejects_bad_input_without_consuming_ids() {
        let mut l = PositionLedger::new(dec!(10000));
        for req in [
            OrderRequest::market(Side::Buy, 0),
            OrderRequest::market(Side::Buy, -4),
            OrderRequest::limit(Side::Buy, dec!(-1), 1),
            OrderRequest { side: Side::Buy, kind: OrderKind::Limit, price: None, qty: 1 },
        ] {
            let err = l.place_order(&req, dec!(100), Timestamp(0)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
        assert_eq!(l.orders().count(), 0);
        let o = l.place_order(&OrderRequest::market(Side::Buy, 1), dec!(100), Timestamp(0)).unwrap();
        assert_eq!(o.id, OrderId(1));
    }

    #[test]
    fn history_is_most_recent_first() {
        let mut l = PositionLedger::new(dec!(10000));
        for _ in 0..3 {
            l.place_order(&OrderRequest::market(Side::Buy, 1), dec!(10), Timestamp(0)).unwrap();
        }
        let ids: Vec<_> = l.orders().map(|o| o.id.0).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn mark_to_market_uses_side() {
        let mut l = PositionLedger::new(dec!(10000));
        let b = l.place_order(&OrderRequest::market(Side::Buy, 2), dec!(100), Timestamp(0)).unwrap();
        let s = l.place_order(&OrderRequest::market(Side::Sell, 2), dec!(100), Timestamp(0)).unwrap();
        l.mark_to_market(dec!(110));
        assert_eq!(l.get(b.id).unwrap().unrealized_pnl, dec!(20.00));
        assert_eq!(l.get(s.id).unwrap().unrealized_pnl, dec!(-20.00));
        assert_eq!(l.cash(), dec!(10000));
    }

    #[test]
    fn close_credits_once() {
        let mut l = PositionLedger::new(dec!(10000));
        let o = l.place_order(&OrderRequest::market(Side::Sell, 4), dec!(50), Timestamp(0)).unwrap();
        let closed = l.close_position(o.id, dec!(47.5)).unwrap();
        assert_eq!(closed.realized_pnl, Some(dec!(10.00)));
        assert_eq!(l.cash(), dec!(10010.00));

        let err = l.close_position(o.id, dec!(40)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(l.cash(), dec!(10010.00));
        assert_eq!(l.get(o.id).unwrap().realized_pnl, Some(dec!(10.00)));
        assert_eq!(l.get(o.id).unwrap().close_price, Some(dec!(47.5)));
    }

    #[test]
    fn realized_pnl_is_frozen_after_close() {
        let mut l = PositionLedger::new(dec!(10000));
        let o = l.place_order(&OrderRequest::market(Side::Buy, 1), dec!(100), Timestamp(0)).unwrap();
        l.close_position(o.id, dec!(105)).unwrap();
        l.mark_to_market(dec!(200));
        let o = l.get(o.id).unwrap();
        assert_eq!(o.realized_pnl, Some(dec!(5.00)));
        assert_eq!(o.unrealized_pnl, Decimal::ZERO);
    }

    #[test]
    fn close_rejects_unknown_and_unfilled() {
        let mut l = PositionLedger::new(dec!(10000));
        assert_eq!(l.close_position(OrderId(42), dec!(1)).unwrap_err().kind(), ErrorKind::NotFound);
        let o = l.place_order(&OrderRequest::limit(Side::Buy, dec!(99), 1), dec!(100), Timestamp(0)).unwrap();
        assert_eq!(l.close_position(o.id, dec!(100)).unwrap_err().kind(), ErrorKind::InvalidState);
        assert_eq!(l.cash(), dec!(10000));
    }
}
