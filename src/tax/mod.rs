// Tax module - weighted-average cost basis, loss carryforward, per-batch engine

pub mod engine;
pub mod loss_carryforward;
pub mod weighted_average;

pub use engine::{EngineState, OperationOutcome, TaxEngine};
pub use loss_carryforward::LossCarryforward;
pub use weighted_average::{compute_gain, compute_weighted_average, sold_value};
