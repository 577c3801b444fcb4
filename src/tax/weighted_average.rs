//! Weighted-average cost basis arithmetic
//!
//! Pure functions: identical inputs always give identical outputs. Every
//! product, difference and quotient is rounded to cents before it is used.
//! Each function returns `None` when an intermediate value does not fit in a
//! `Decimal` (or the position size in an `i64`).

use rust_decimal::Decimal;

use crate::utils::round_money;

/// Updated average price after buying `purchase_qty` units at `purchase_price`
/// on top of a position of `current_qty` units at `current_avg`.
///
/// Returns zero when the resulting position is empty instead of dividing by
/// zero.
pub fn compute_weighted_average(
    current_avg: Decimal,
    current_qty: i64,
    purchase_price: Decimal,
    purchase_qty: i64,
) -> Option<Decimal> {
    let total_qty = current_qty.checked_add(purchase_qty)?;
    if total_qty == 0 {
        return Some(Decimal::ZERO);
    }

    let current_cost = current_avg.checked_mul(Decimal::from(current_qty))?;
    let purchase_cost = purchase_price.checked_mul(Decimal::from(purchase_qty))?;

    current_cost
        .checked_add(purchase_cost)?
        .checked_div(Decimal::from(total_qty))
        .map(round_money)
}

/// Proceeds of selling `qty` units at `price`
pub fn sold_value(price: Decimal, qty: i64) -> Option<Decimal> {
    price.checked_mul(Decimal::from(qty)).map(round_money)
}

/// Realized gain of a sale against the average price; negative for a loss.
pub fn compute_gain(sell_price: Decimal, sell_qty: i64, avg_price: Decimal) -> Option<Decimal> {
    let proceeds = sold_value(sell_price, sell_qty)?;
    let cost_basis = sold_value(avg_price, sell_qty)?;
    proceeds.checked_sub(cost_basis).map(round_money)
}
