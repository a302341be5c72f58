use crate::{Order, Side};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Round a money amount to cents, half away from zero.
pub fn round_money(v: Decimal) -> Decimal {
    v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// PnL of `qty` units entered at `execution_price` and marked at `mark`.
pub fn pnl_at(side: Side, execution_price: Decimal, mark: Decimal, qty: u64) -> Decimal {
    let diff = match side {
        Side::Buy => mark - execution_price,
        Side::Sell => execution_price - mark,
    };
    round_money(diff * Decimal::from(qty))
}

/// Unrealized PnL for an open order; `None` when it holds no position.
pub fn pnl_unrealized(order: &Order, mark: Decimal) -> Option<Decimal> {
    if !order.is_open() {
        return None;
    }
    let exec = order.execution_price?;
    Some(pnl_at(order.side, exec, mark, order.qty))
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountSummary {
    pub cash: Decimal,
    pub unrealized_pnl: Decimal,
    pub realized_pnl: Decimal,
    pub equity: Decimal,
    pub open_positions: usize,
}

pub fn summarize<'a>(cash: Decimal, orders: impl IntoIterator<Item = &'a Order>) -> AccountSummary {
    let mut s = AccountSummary { cash, ..AccountSummary::default() };
    for o in orders {
        if o.is_open() {
            s.unrealized_pnl += o.unrealized_pnl;
            s.open_positions += 1;
        }
        if let Some(r) = o.realized_pnl {
            s.realized_pnl += r;
        }
    }
    s.equity = round_money(cash + s.unrealized_pnl);
    s
}
