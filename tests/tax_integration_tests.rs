use anyhow::{Context, Result};
use capital_gain::config::{ConfigOverrides, TaxConfig};
use capital_gain::importers::parse_operations;
use capital_gain::models::{Batch, OperationKind};
use capital_gain::reports::format_tax_lines;
use capital_gain::tax::{compute_weighted_average, OperationOutcome, TaxEngine};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::Path;

// Helpers
fn process(input: &str, config: TaxConfig) -> Result<(Vec<Batch>, Vec<Vec<OperationOutcome>>)> {
    let mut batches = parse_operations(input)?;
    let outcomes = TaxEngine::new(config).calculate_taxes(&mut batches)?;
    Ok((batches, outcomes))
}

fn taxes_for(input: &str, config: TaxConfig) -> Result<Vec<Vec<Decimal>>> {
    let (batches, _) = process(input, config)?;
    Ok(batches
        .iter()
        .map(|batch| batch.iter().map(|op| op.tax_paid).collect())
        .collect())
}

fn custom_config(tax_rate: Decimal, exemption_limit: Decimal) -> TaxConfig {
    TaxConfig::default().with_overrides(ConfigOverrides {
        tax_rate: Some(tax_rate),
        exemption_limit: Some(exemption_limit),
    })
}

/// Drop spaces/tabs and unify line endings
fn normalize_output(output: &str) -> String {
    output
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter(|c| *c != ' ' && *c != '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

fn fixture_pairs() -> Vec<(String, String)> {
    (0..=9)
        .filter_map(|i| {
            let input = format!("tests/fixtures/input{}.txt", i);
            let output = format!("tests/fixtures/output{}.txt", i);
            (Path::new(&input).exists() && Path::new(&output).exists()).then_some((input, output))
        })
        .collect()
}

#[test]
fn test_fixtures_match_expected_output() -> Result<()> {
    let pairs = fixture_pairs();
    assert!(!pairs.is_empty(), "no fixtures found");

    for (input_path, output_path) in pairs {
        let input = std::fs::read_to_string(&input_path)?;
        let expected = std::fs::read_to_string(&output_path)?;

        let (batches, _) = process(&input, TaxConfig::default())
            .with_context(|| format!("processing {}", input_path))?;
        let actual = format_tax_lines(&batches)?.join("\n");

        assert_eq!(
            normalize_output(&actual),
            normalize_output(&expected),
            "mismatch for {}",
            input_path
        );
    }

    Ok(())
}

#[test]
fn test_sale_under_exemption() -> Result<()> {
    let taxes = taxes_for(
        r#"[{"operation":"buy","unit-cost":10.00,"quantity":1000},{"operation":"sell","unit-cost":15.00,"quantity":500}]"#,
        TaxConfig::default(),
    )?;
    assert_eq!(taxes, vec![vec![dec!(0), dec!(0)]]);
    Ok(())
}

#[test]
fn test_sale_over_exemption() -> Result<()> {
    let taxes = taxes_for(
        r#"[{"operation":"buy","unit-cost":10.00,"quantity":10000},{"operation":"sell","unit-cost":20.00,"quantity":5000}]"#,
        TaxConfig::default(),
    )?;
    assert_eq!(taxes, vec![vec![dec!(0), dec!(10000.00)]]);
    Ok(())
}

#[test]
fn test_accumulated_loss_deducted_from_later_gain() -> Result<()> {
    // Loss of 25000, then a gain of 30000: 20% of the remaining 5000
    let taxes = taxes_for(
        r#"[{"operation":"buy","unit-cost":10.00,"quantity":10000},{"operation":"sell","unit-cost":5.00,"quantity":5000},{"operation":"sell","unit-cost":20.00,"quantity":3000}]"#,
        TaxConfig::default(),
    )?;
    assert_eq!(taxes, vec![vec![dec!(0), dec!(0), dec!(1000.00)]]);
    Ok(())
}

#[test]
fn test_custom_rate_and_exemption() -> Result<()> {
    let config = custom_config(dec!(0.15), dec!(30000));
    let input = r#"[{"operation":"buy","unit-cost":10.00,"quantity":1000},{"operation":"sell","unit-cost":25.00,"quantity":1000}]"#;

    // Sold value 25000 is within the 30000 limit
    assert_eq!(taxes_for(input, config)?, vec![vec![dec!(0), dec!(0)]]);
    // Default 20000 limit taxes the same 15000 gain at 20%
    assert_eq!(
        taxes_for(input, TaxConfig::default())?,
        vec![vec![dec!(0), dec!(3000)]]
    );
    Ok(())
}

#[test]
fn test_various_single_sale_scenarios() -> Result<()> {
    let cases = [
        (dec!(10.00), 1000, dec!(15.00), 500, dec!(0)),
        (dec!(10.00), 1000, dec!(25.00), 1000, dec!(3000)),
        (dec!(20.00), 1000, dec!(15.00), 1000, dec!(0)),
    ];

    for (buy_cost, buy_qty, sell_cost, sell_qty, expected) in cases {
        let input = format!(
            r#"[{{"operation":"buy","unit-cost":{},"quantity":{}}},{{"operation":"sell","unit-cost":{},"quantity":{}}}]"#,
            buy_cost, buy_qty, sell_cost, sell_qty
        );
        let taxes = taxes_for(&input, TaxConfig::default())?;
        assert_eq!(taxes[0][1], expected, "buy {}x{} sell {}x{}", buy_cost, buy_qty, sell_cost, sell_qty);
    }
    Ok(())
}

#[test]
fn test_loss_state_resets_between_batches() -> Result<()> {
    let input = "[{\"operation\":\"buy\",\"unit-cost\":10.00,\"quantity\":10000},{\"operation\":\"sell\",\"unit-cost\":5.00,\"quantity\":5000}]\n\
                 [{\"operation\":\"buy\",\"unit-cost\":10.00,\"quantity\":10000},{\"operation\":\"sell\",\"unit-cost\":20.00,\"quantity\":5000}]";
    let (_, outcomes) = process(input, TaxConfig::default())?;

    assert_eq!(outcomes[0][1].accumulated_loss, dec!(25000));
    assert_eq!(outcomes[1][0].accumulated_loss, Decimal::ZERO);
    assert_eq!(outcomes[1][1].tax_paid, dec!(10000));
    Ok(())
}

#[test]
fn test_large_taxes_keep_every_digit() -> Result<()> {
    let input = "[{\"operation\":\"buy\",\"unit-cost\":0.01,\"quantity\":1000000000},{\"operation\":\"sell\",\"unit-cost\":123456789.13,\"quantity\":1000000000}]\n\
                 [{\"operation\":\"buy\",\"unit-cost\":1.00,\"quantity\":1000000000},{\"operation\":\"sell\",\"unit-cost\":100000001.00,\"quantity\":1000000000}]";
    let (batches, _) = process(input, TaxConfig::default())?;

    assert_eq!(
        format_tax_lines(&batches)?,
        vec![
            r#"[{"tax":0.0},{"tax":24691357824000000.0}]"#,
            r#"[{"tax":0.0},{"tax":20000000000000000.0}]"#,
        ]
    );
    Ok(())
}

#[test]
fn test_amounts_beyond_decimal_range_fail_cleanly() {
    let input = r#"[{"operation":"buy","unit-cost":79228162514264337593543950.00,"quantity":1000}]"#;
    let err = process(input, TaxConfig::default()).unwrap_err();
    assert!(format!("{:#}", err).contains("arithmetic overflow at operation 1"));
}

#[test]
fn test_weighted_average_examples() {
    let cases = [
        (dec!(10.00), 100, dec!(20.00), 100, dec!(15.00)),
        (dec!(5.00), 200, dec!(15.00), 100, dec!(8.33)),
        (dec!(0), 0, dec!(10.00), 100, dec!(10.00)),
    ];
    for (avg, qty, price, buy_qty, expected) in cases {
        assert_eq!(compute_weighted_average(avg, qty, price, buy_qty), Some(expected));
    }
}

#[test]
fn test_buys_and_losses_are_never_taxed_across_fixtures() -> Result<()> {
    for (input_path, _) in fixture_pairs() {
        let input = std::fs::read_to_string(&input_path)?;
        let (batches, outcomes) = process(&input, TaxConfig::default())?;

        for (batch, batch_outcomes) in batches.iter().zip(&outcomes) {
            let mut carried = Decimal::ZERO;
            for (op, outcome) in batch.iter().zip(batch_outcomes) {
                match (&op.kind, outcome.gain) {
                    (OperationKind::Buy, _) => assert_eq!(op.tax_paid, Decimal::ZERO),
                    (OperationKind::Sell, Some(gain)) if gain <= Decimal::ZERO => {
                        assert_eq!(op.tax_paid, Decimal::ZERO);
                        assert_eq!(outcome.accumulated_loss, carried + gain.abs());
                    }
                    (OperationKind::Sell, Some(_)) if outcome.exempt => {
                        assert_eq!(op.tax_paid, Decimal::ZERO);
                        assert_eq!(outcome.accumulated_loss, carried);
                    }
                    _ => {}
                }
                carried = outcome.accumulated_loss;
            }
        }
    }
    Ok(())
}
