//! Tax result rendering
//!
//! The machine-readable output is one JSON array per batch, one line each,
//! in input order: `[{"tax":0.0},{"tax":10000.0}]`.

use anyhow::Context;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::value::RawValue;

use crate::error::Result;
use crate::models::{Batch, Operation, OperationKind};
use crate::tax::OperationOutcome;
use crate::utils::round_display;

/// The tax is written as a raw JSON number with exactly the decimal digits
/// of the rounded value, never through a float.
#[derive(Debug, Serialize)]
struct TaxEntry {
    tax: Box<RawValue>,
}

impl TaxEntry {
    fn new(tax_paid: Decimal) -> Result<Self> {
        let tax = RawValue::from_string(round_display(tax_paid).to_string())
            .with_context(|| format!("Tax {} is not a valid JSON number", tax_paid))?;
        Ok(Self { tax })
    }
}

/// Render one batch as a compact JSON array of `{"tax": n}` objects.
pub fn format_tax_line(batch: &[Operation]) -> Result<String> {
    let entries = batch
        .iter()
        .map(|op| TaxEntry::new(op.tax_paid))
        .collect::<Result<Vec<_>>>()?;

    serde_json::to_string(&entries).context("Failed to serialize tax results")
}

/// Render all batches, one line per batch.
pub fn format_tax_lines(batches: &[Batch]) -> Result<Vec<String>> {
    batches.iter().map(|batch| format_tax_line(batch)).collect()
}

/// Totals for one processed batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub buys: usize,
    pub sells: usize,
    pub skipped: usize,
    pub total_tax: Decimal,
    pub open_quantity: i64,
    pub weighted_average: Decimal,
    pub carried_loss: Decimal,
}

impl BatchSummary {
    pub fn from_outcomes(batch: &[Operation], outcomes: &[OperationOutcome]) -> Self {
        let count = |kind: &OperationKind| batch.iter().filter(|op| &op.kind == kind).count();
        let buys = count(&OperationKind::Buy);
        let sells = count(&OperationKind::Sell);
        let last = outcomes.last();

        Self {
            buys,
            sells,
            skipped: batch.len() - buys - sells,
            total_tax: outcomes.iter().map(|o| o.tax_paid).sum(),
            open_quantity: last.map(|o| o.open_quantity).unwrap_or(0),
            weighted_average: last.map(|o| o.weighted_average).unwrap_or(Decimal::ZERO),
            carried_loss: last.map(|o| o.accumulated_loss).unwrap_or(Decimal::ZERO),
        }
    }
}
