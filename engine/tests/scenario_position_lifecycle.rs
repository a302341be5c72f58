//! Scenario: a single position from placement to close.
//!
//! Cash must move exactly once, by the realized PnL, and the closed order
//! must stay in history with its close stamped.

use desk_engine::{ErrorKind, OrderId, OrderKind, OrderRequest, PositionLedger, Side, Timestamp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn buy_mark_close_credits_cash() {
    let mut ledger = PositionLedger::new(dec!(10000));

    let order = ledger
        .place_order(&OrderRequest::market(Side::Buy, 1), dec!(150), Timestamp(0))
        .unwrap();
    assert!(order.filled);
    assert_eq!(order.execution_price, Some(dec!(150)));

    ledger.mark_to_market(dec!(160));
    assert_eq!(ledger.get(order.id).unwrap().unrealized_pnl, dec!(10.00));
    assert_eq!(ledger.summary().equity, dec!(10010.00));
    assert_eq!(ledger.cash(), dec!(10000));

    let closed = ledger.close_position(order.id, dec!(160)).unwrap();
    assert!(closed.closed);
    assert_eq!(closed.close_price, Some(dec!(160)));
    assert_eq!(closed.realized_pnl, Some(dec!(10.00)));
    assert_eq!(ledger.cash(), dec!(10010.00));

    let snap = ledger.snapshot();
    assert_eq!(snap.orders.len(), 1);
    assert_eq!(snap.summary.open_positions, 0);
    assert_eq!(snap.summary.realized_pnl, dec!(10.00));
}

#[test]
fn double_close_does_not_double_credit() {
    let mut ledger = PositionLedger::new(dec!(10000));
    let o = ledger
        .place_order(&OrderRequest::market(Side::Sell, 2), dec!(100), Timestamp(0))
        .unwrap();
    ledger.close_position(o.id, dec!(90)).unwrap();
    assert_eq!(ledger.cash(), dec!(10020.00));

    for _ in 0..3 {
        let err = ledger.close_position(o.id, dec!(50)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }
    assert_eq!(ledger.cash(), dec!(10020.00));
}

#[test]
fn limit_orders_stay_pending_and_unclosable() {
    let mut ledger = PositionLedger::new(dec!(10000));
    let o = ledger
        .place_order(&OrderRequest::limit(Side::Buy, dec!(95), 5), dec!(100), Timestamp(0))
        .unwrap();
    assert_eq!(o.kind, OrderKind::Limit);
    assert_eq!(o.requested_price, Some(dec!(95)));

    // the mid crosses the limit repeatedly; nothing ever matches it
    for mid in [dec!(94), dec!(90), dec!(95), dec!(120)] {
        ledger.mark_to_market(mid);
        assert!(!ledger.get(o.id).unwrap().filled);
    }
    let err = ledger.close_position(o.id, dec!(100)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(ledger.cash(), dec!(10000));
    assert_eq!(ledger.summary().open_positions, 0);
}

#[test]
fn unknown_id_is_not_found() {
    let mut ledger = PositionLedger::new(dec!(10000));
    let err = ledger.close_position(OrderId(7), dec!(100)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(ledger.cash(), dec!(10000));
}

#[test]
fn ids_are_monotonic_across_closes() {
    let mut ledger = PositionLedger::new(Decimal::ZERO);
    let a = ledger.place_order(&OrderRequest::market(Side::Buy, 1), dec!(10), Timestamp(0)).unwrap();
    ledger.close_position(a.id, dec!(9)).unwrap();
    let b = ledger.place_order(&OrderRequest::market(Side::Buy, 1), dec!(10), Timestamp(1)).unwrap();
    assert!(b.id > a.id);
    assert_eq!(ledger.cash(), dec!(-1.00));
}
