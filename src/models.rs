use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Operation kind (buy or sell)
///
/// Anything that is neither a buy nor a sell is kept verbatim so the
/// boundary can report it; the engine gives it no tax effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Buy,
    Sell,
    Other(String),
}

impl OperationKind {
    pub fn as_str(&self) -> &str {
        match self {
            OperationKind::Buy => "buy",
            OperationKind::Sell => "sell",
            OperationKind::Other(raw) => raw,
        }
    }

    /// Case-insensitive but otherwise exact (no trimming); unrecognized
    /// labels become `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "buy" => OperationKind::Buy,
            "sell" => OperationKind::Sell,
            _ => OperationKind::Other(label.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, OperationKind::Other(_))
    }
}

impl FromStr for OperationKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single buy or sell of the traded stock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub kind: OperationKind,
    pub unit_cost: Decimal,
    pub quantity: i64,
    /// Set by the tax engine; always zero for buys and unknown kinds.
    pub tax_paid: Decimal,
}

impl Operation {
    pub fn new(kind: OperationKind, unit_cost: Decimal, quantity: i64) -> Self {
        Self {
            kind,
            unit_cost,
            quantity,
            tax_paid: Decimal::ZERO,
        }
    }

    pub fn buy(unit_cost: Decimal, quantity: i64) -> Self {
        Self::new(OperationKind::Buy, unit_cost, quantity)
    }

    pub fn sell(unit_cost: Decimal, quantity: i64) -> Self {
        Self::new(OperationKind::Sell, unit_cost, quantity)
    }
}

/// One independent trading history, processed with its own fresh state
pub type Batch = Vec<Operation>;
