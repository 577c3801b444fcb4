use anyhow::{Context, Result};
use std::io::Write;
use tracing::{info, warn};

use capital_gain::config::{ConfigOverrides, TaxConfig};
use capital_gain::importers::{import_operations, validate_batches, ValidationResult};
use capital_gain::reports::format_tax_lines;
use capital_gain::tax::TaxEngine;

use crate::cli::formatters::format_batch_table;
use crate::cli::Cli;

/// Layer defaults, config file, environment and flags into the run's
/// configuration. Flags win.
pub fn build_config(cli: &Cli) -> Result<TaxConfig> {
    let from_flags = ConfigOverrides {
        tax_rate: cli.tax_rate,
        exemption_limit: cli.exemption_limit,
    };

    TaxConfig::load(cli.config.as_deref(), from_flags).context("Invalid tax configuration")
}

/// Per-field issue counts, e.g. `operation: 1, quantity: 2`
fn format_issue_counts(validation: &ValidationResult) -> String {
    validation
        .issue_summary()
        .iter()
        .map(|(field, count)| format!("{}: {}", field, count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read, validate and process every batch, then print the results.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let config = build_config(cli)?;
    info!("Using {}", config);

    let mut batches = import_operations(&cli.input)?;

    let validation = validate_batches(&batches);
    if cli.strict {
        validation.into_error()?;
    } else {
        for issue in &validation.issues {
            warn!("{}", issue);
        }
        if validation.has_issues() {
            warn!(
                "{} validation issue(s) ignored ({})",
                validation.issues.len(),
                format_issue_counts(&validation)
            );
        }
    }

    let engine = TaxEngine::new(config);
    let outcomes = engine.calculate_taxes(&mut batches)?;

    if cli.report {
        for (i, (batch, batch_outcomes)) in batches.iter().zip(&outcomes).enumerate() {
            write!(out, "{}", format_batch_table(i + 1, batch, batch_outcomes))?;
        }
    } else {
        for line in format_tax_lines(&batches)? {
            writeln!(out, "{}", line)?;
        }
    }

    out.flush()?;
    Ok(())
}
