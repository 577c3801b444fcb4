//! Operation validation module
//!
//! The tax engine accepts whatever it is given; this module is where the
//! boundary checks records for problems. All issues are collected instead of
//! stopping at the first, so the caller can either report them as warnings or
//! reject the whole input (strict mode).

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::error::CapitalGainError;
use crate::models::{Batch, Operation};
use crate::utils::MONEY_DP;

/// A validation issue found in one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Batch (input line among non-blank batches), 1-indexed for user display
    pub batch: usize,
    /// Position of the operation inside its batch, 1-indexed
    pub row: usize,
    /// Field name that has the issue (e.g., "operation", "quantity")
    pub field: String,
    /// The problematic value
    pub value: String,
    /// Description of why this is an issue
    pub reason: String,
    /// Suggestion for fixing the issue (if available)
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn new(
        batch: usize,
        row: usize,
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            batch,
            row,
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "batch {}, operation {}: {} '{}': {}",
            self.batch, self.row, self.field, self.value, self.reason
        )?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}

/// All issues found across the input
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Count issues by field for summary reporting
    pub fn issue_summary(&self) -> BTreeMap<String, usize> {
        let mut summary = BTreeMap::new();
        for issue in &self.issues {
            *summary.entry(issue.field.clone()).or_insert(0) += 1;
        }
        summary
    }

    /// Turn the collected issues into a single error, or `Ok` when clean.
    pub fn into_error(self) -> Result<(), CapitalGainError> {
        if !self.has_issues() {
            return Ok(());
        }
        let details: Vec<String> = self.issues.iter().map(|i| i.to_string()).collect();
        Err(CapitalGainError::ValidationError(format!(
            "{} issue(s) found:\n  {}",
            self.issues.len(),
            details.join("\n  ")
        )))
    }
}

/// Validate every operation of every batch.
pub fn validate_batches(batches: &[Batch]) -> ValidationResult {
    let mut result = ValidationResult::default();

    for (batch_idx, batch) in batches.iter().enumerate() {
        for (op_idx, op) in batch.iter().enumerate() {
            result
                .issues
                .extend(validate_operation(batch_idx + 1, op_idx + 1, op));
        }
    }

    result
}

fn validate_operation(batch: usize, row: usize, op: &Operation) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if !op.kind.is_known() {
        issues.push(
            ValidationIssue::new(
                batch,
                row,
                "operation",
                op.kind.as_str(),
                "Unrecognized operation; it will not affect the tax",
            )
            .with_suggestion("Use \"buy\" or \"sell\""),
        );
    }

    if op.quantity < 0 {
        issues.push(ValidationIssue::new(
            batch,
            row,
            "quantity",
            op.quantity.to_string(),
            "Quantity cannot be negative",
        ));
    }

    if op.unit_cost < Decimal::ZERO {
        issues.push(ValidationIssue::new(
            batch,
            row,
            "unit-cost",
            op.unit_cost.to_string(),
            "Unit cost cannot be negative",
        ));
    } else if op.unit_cost.normalize().scale() > MONEY_DP {
        issues.push(
            ValidationIssue::new(
                batch,
                row,
                "unit-cost",
                op.unit_cost.to_string(),
                "Unit cost has more than 2 decimal places",
            )
            .with_suggestion("Round prices to cents"),
        );
    }

    issues
}
