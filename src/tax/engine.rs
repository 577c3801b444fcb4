//! Per-batch capital gains tax engine
//!
//! Walks a batch of operations in order, threading an [`EngineState`]
//! (average price, open quantity, carried loss) from one operation to the
//! next. Every batch starts from a zeroed state, so batches never influence
//! each other.

use anyhow::Context;
use rust_decimal::Decimal;
use tracing::debug;

use super::loss_carryforward::LossCarryforward;
use super::weighted_average::{compute_gain, compute_weighted_average, sold_value};
use crate::config::TaxConfig;
use crate::error::{CapitalGainError, Result};
use crate::models::{Batch, Operation, OperationKind};
use crate::utils::round_money;

/// Running position of a single batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineState {
    pub weighted_average: Decimal,
    /// Not validated; goes negative when sells exceed buys.
    pub open_quantity: i64,
    pub losses: LossCarryforward,
}

/// What happened when one operation was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub tax_paid: Decimal,
    /// Realized gain (negative for a loss); `None` for anything but a sale.
    pub gain: Option<Decimal>,
    /// Profitable sale whose proceeds stayed within the exemption limit
    pub exempt: bool,
    pub weighted_average: Decimal,
    pub open_quantity: i64,
    pub accumulated_loss: Decimal,
}

impl OperationOutcome {
    fn untaxed(state: &EngineState, gain: Option<Decimal>, exempt: bool) -> Self {
        Self::taxed(state, Decimal::ZERO, gain, exempt)
    }

    fn taxed(state: &EngineState, tax_paid: Decimal, gain: Option<Decimal>, exempt: bool) -> Self {
        Self {
            tax_paid,
            gain,
            exempt,
            weighted_average: state.weighted_average,
            open_quantity: state.open_quantity,
            accumulated_loss: state.losses.remaining(),
        }
    }
}

pub struct TaxEngine {
    config: TaxConfig,
}

impl TaxEngine {
    pub fn new(config: TaxConfig) -> Self {
        Self { config }
    }

    /// Apply one operation to `state`, returning the next state and the outcome.
    ///
    /// `None` when an amount or the position size no longer fits its type.
    pub fn apply(
        &self,
        state: EngineState,
        op: &Operation,
    ) -> Option<(EngineState, OperationOutcome)> {
        match &op.kind {
            OperationKind::Buy => self.apply_buy(state, op),
            OperationKind::Sell => self.apply_sell(state, op),
            OperationKind::Other(raw) => {
                debug!("Skipping unrecognized operation '{}'", raw);
                Some((state, OperationOutcome::untaxed(&state, None, false)))
            }
        }
    }

    fn apply_buy(
        &self,
        mut state: EngineState,
        op: &Operation,
    ) -> Option<(EngineState, OperationOutcome)> {
        state.weighted_average = compute_weighted_average(
            state.weighted_average,
            state.open_quantity,
            op.unit_cost,
            op.quantity,
        )?;
        state.open_quantity = state.open_quantity.checked_add(op.quantity)?;

        Some((state, OperationOutcome::untaxed(&state, None, false)))
    }

    fn apply_sell(
        &self,
        mut state: EngineState,
        op: &Operation,
    ) -> Option<(EngineState, OperationOutcome)> {
        let gain = compute_gain(op.unit_cost, op.quantity, state.weighted_average)?;
        let proceeds = sold_value(op.unit_cost, op.quantity)?;
        state.open_quantity = state.open_quantity.checked_sub(op.quantity)?;

        if gain <= Decimal::ZERO {
            state.losses.record_loss(gain.abs())?;
            debug!(
                "Sale of {} at {} realized loss {}; carried loss now {}",
                op.quantity,
                op.unit_cost,
                gain,
                state.losses.remaining()
            );
            return Some((state, OperationOutcome::untaxed(&state, Some(gain), false)));
        }

        // The carried loss is left alone on exempt sales
        if proceeds <= self.config.exemption_limit() {
            debug!(
                "Sale of {} at {} exempt: proceeds {} within limit {}",
                op.quantity,
                op.unit_cost,
                proceeds,
                self.config.exemption_limit()
            );
            return Some((state, OperationOutcome::untaxed(&state, Some(gain), true)));
        }

        let (taxable, offset) = state.losses.apply_losses_to_profit(gain);
        let tax_paid = round_money(taxable.checked_mul(self.config.tax_rate())?);
        debug!(
            "Sale of {} at {}: gain {}, loss offset {}, tax {}",
            op.quantity, op.unit_cost, gain, offset, tax_paid
        );

        Some((state, OperationOutcome::taxed(&state, tax_paid, Some(gain), false)))
    }

    /// Run a batch from a fresh state, writing `tax_paid` onto every operation.
    pub fn calculate_batch(
        &self,
        batch: &mut [Operation],
    ) -> std::result::Result<Vec<OperationOutcome>, CapitalGainError> {
        let mut state = EngineState::default();

        batch
            .iter_mut()
            .enumerate()
            .map(|(idx, op)| {
                let (next, outcome) = self
                    .apply(state, op)
                    .ok_or(CapitalGainError::Overflow { operation: idx + 1 })?;
                state = next;
                op.tax_paid = outcome.tax_paid;
                Ok(outcome)
            })
            .collect()
    }

    /// Run every batch independently, in input order.
    pub fn calculate_taxes(&self, batches: &mut [Batch]) -> Result<Vec<Vec<OperationOutcome>>> {
        batches
            .iter_mut()
            .enumerate()
            .map(|(idx, batch)| {
                self.calculate_batch(batch)
                    .with_context(|| format!("Failed to calculate taxes for batch {}", idx + 1))
            })
            .collect()
    }
}
