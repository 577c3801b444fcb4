//! Line-delimited JSON operations parser
//!
//! Each non-blank line holds one batch as a JSON array of operation objects:
//!
//! ```text
//! [{"operation":"buy", "unit-cost":10.00, "quantity": 10000}, {"operation":"sell", "unit-cost":20.00, "quantity": 5000}]
//! ```
//!
//! Property names are matched case-insensitively. A malformed line aborts the
//! whole parse.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{CapitalGainError, Result};
use crate::models::{Batch, Operation, OperationKind};

#[derive(Debug, Deserialize)]
struct RawOperation {
    operation: String,
    #[serde(rename = "unit-cost", default)]
    unit_cost: Decimal,
    /// Share counts are 32-bit; anything larger fails the line.
    #[serde(default)]
    quantity: i32,
}

impl From<RawOperation> for Operation {
    fn from(raw: RawOperation) -> Self {
        Operation::new(
            OperationKind::from_label(&raw.operation),
            raw.unit_cost,
            i64::from(raw.quantity),
        )
    }
}

/// Parse every batch in `content`, in input order.
pub fn parse_operations(content: &str) -> Result<Vec<Batch>> {
    let mut batches = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_number = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_line(line) {
            Ok(Some(batch)) => batches.push(batch),
            Ok(None) => debug!("Line {} is null, skipping", line_number),
            Err(message) => {
                return Err(CapitalGainError::ParseError {
                    line: line_number,
                    message,
                }
                .into())
            }
        }
    }

    info!("Parsed {} batch(es)", batches.len());
    Ok(batches)
}

/// Parse a single line. `Ok(None)` means the line was a JSON `null`.
pub fn parse_line(line: &str) -> std::result::Result<Option<Batch>, String> {
    let entries: Option<Vec<Map<String, Value>>> =
        serde_json::from_str(line).map_err(|e| e.to_string())?;

    let Some(entries) = entries else {
        return Ok(None);
    };

    entries
        .into_iter()
        .map(|entry| {
            let normalized: Map<String, Value> = entry
                .into_iter()
                .map(|(key, value)| (key.to_ascii_lowercase(), value))
                .collect();
            serde_json::from_value::<RawOperation>(Value::Object(normalized))
                .map(Operation::from)
                .map_err(|e| e.to_string())
        })
        .collect::<std::result::Result<Batch, String>>()
        .map(Some)
}
