//! Output formatting module for CLI display
//!
//! Human-readable rendering of processed batches, kept apart from the
//! calculation itself.

use capital_gain::models::Operation;
use capital_gain::reports::BatchSummary;
use capital_gain::tax::OperationOutcome;
use capital_gain::utils::{format_currency, round_display};
use colored::Colorize;
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

#[derive(Tabled)]
struct OperationRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Operation")]
    operation: String,
    #[tabled(rename = "Unit Cost")]
    unit_cost: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Avg Price")]
    avg_price: String,
    #[tabled(rename = "Gain")]
    gain: String,
    #[tabled(rename = "Carried Loss")]
    carried_loss: String,
    #[tabled(rename = "Tax")]
    tax: String,
}

fn format_gain(outcome: &OperationOutcome) -> String {
    match outcome.gain {
        None => "-".to_string(),
        Some(gain) if outcome.exempt => format!("{} (exempt)", format_currency(gain))
            .yellow()
            .to_string(),
        Some(gain) if gain > Decimal::ZERO => format_currency(gain).green().to_string(),
        Some(gain) => format_currency(gain).red().to_string(),
    }
}

/// Format one processed batch as a table plus summary
pub fn format_batch_table(
    number: usize,
    batch: &[Operation],
    outcomes: &[OperationOutcome],
) -> String {
    let mut output = format!("\n{} Batch {}\n\n", "📊".cyan().bold(), number);

    if batch.is_empty() {
        output.push_str(&format!("{} No operations\n", "ℹ".blue().bold()));
        return output;
    }

    let rows: Vec<OperationRow> = batch
        .iter()
        .zip(outcomes)
        .enumerate()
        .map(|(i, (op, outcome))| {
            let operation = if op.kind.is_known() {
                op.kind.as_str().to_string()
            } else {
                format!("{} (skipped)", op.kind).bright_black().to_string()
            };

            OperationRow {
                index: i + 1,
                operation,
                unit_cost: format_currency(op.unit_cost),
                quantity: op.quantity.to_string(),
                avg_price: format_currency(outcome.weighted_average),
                gain: format_gain(outcome),
                carried_loss: format_currency(outcome.accumulated_loss),
                tax: format_currency(round_display(outcome.tax_paid)),
            }
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    // Right-align numeric columns, leaving # and Operation alone
    table.modify(Columns::new(2..), Alignment::right());
    output.push_str(&table.to_string());

    let summary = BatchSummary::from_outcomes(batch, outcomes);
    output.push_str(&format!(
        "\n\n{:<20} {} / {}",
        "Buys / Sells:".bold(),
        summary.buys,
        summary.sells
    ));
    if summary.skipped > 0 {
        output.push_str(&format!(
            "\n{:<20} {}",
            "Skipped:".bold(),
            summary.skipped.to_string().yellow()
        ));
    }
    output.push_str(&format!(
        "\n{:<20} {} @ {}",
        "Open Position:".bold(),
        summary.open_quantity,
        format_currency(summary.weighted_average)
    ));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Carried Loss:".bold(),
        format_currency(summary.carried_loss)
    ));

    let total_tax = format_currency(round_display(summary.total_tax));
    let total_tax = if summary.total_tax > Decimal::ZERO {
        total_tax.red()
    } else {
        total_tax.green()
    };
    output.push_str(&format!("\n{:<20} {}\n", "Total Tax:".bold(), total_tax));

    output
}
