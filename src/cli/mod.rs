use clap::Parser;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

pub mod formatters;
pub mod runner;

#[derive(Parser, Debug)]
#[command(name = "capital-gain")]
#[command(
    version,
    about = "Capital gains tax calculator for stock buy/sell operations"
)]
#[command(
    long_about = "Reads one JSON array of operations per line and prints, for each line, the tax owed on every operation. Uses a weighted-average cost basis, an exemption limit on sale proceeds and loss carryforward within each line."
)]
pub struct Cli {
    /// Operations file, one JSON array per line ("-" reads stdin)
    #[arg(short, long, default_value = "input.txt")]
    pub input: String,

    /// Tax rate as a fraction (e.g. 0.20 for 20%)
    #[arg(short = 't', long, value_parser = parse_decimal)]
    pub tax_rate: Option<Decimal>,

    /// Sales with proceeds at or below this value are exempt
    #[arg(short = 'e', long, value_parser = parse_decimal)]
    pub exemption_limit: Option<Decimal>,

    /// TOML file with tax_rate / exemption_limit
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Reject input with unknown operations or invalid values instead of warning
    #[arg(long)]
    pub strict: bool,

    /// Print a table per batch instead of JSON lines
    #[arg(long)]
    pub report: bool,

    /// Disable colorized/ANSI output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Log engine decisions to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim()).map_err(|_| format!("'{}' is not a decimal number", raw))
}
