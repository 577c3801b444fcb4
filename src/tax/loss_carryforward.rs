use rust_decimal::Decimal;

use crate::utils::round_money;

/// Losses realized earlier in a batch and not yet offset against a gain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LossCarryforward {
    remaining: Decimal,
}

impl LossCarryforward {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loss still available to offset future gains
    pub fn remaining(&self) -> Decimal {
        self.remaining
    }

    /// Record a new loss for carryforward. Non-positive amounts are ignored.
    ///
    /// Returns `None`, leaving the balance untouched, if the total would
    /// overflow.
    pub fn record_loss(&mut self, loss_amount: Decimal) -> Option<()> {
        if loss_amount > Decimal::ZERO {
            self.remaining = round_money(self.remaining.checked_add(loss_amount)?);
        }
        Some(())
    }

    /// Apply losses to a profit amount, returns (profit_after_loss_offset, total_loss_applied)
    ///
    /// The carried loss shrinks by the whole profit, floored at zero.
    pub fn apply_losses_to_profit(&mut self, profit: Decimal) -> (Decimal, Decimal) {
        if profit <= Decimal::ZERO {
            return (profit, Decimal::ZERO);
        }

        let applied = self.remaining.min(profit);
        let taxable = round_money((profit - self.remaining).max(Decimal::ZERO));
        self.remaining = round_money((self.remaining - profit).max(Decimal::ZERO));

        (taxable, applied)
    }
}
