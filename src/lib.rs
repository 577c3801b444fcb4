//! capital-gain - capital gains tax on stock operations
//!
//! This library computes the tax owed on each sale of a sequence of buy/sell
//! operations, using a weighted-average cost basis, a per-sale exemption
//! limit and loss carryforward inside each independent batch.

pub mod config;
pub mod error;
pub mod importers;
pub mod models;
pub mod reports;
pub mod tax;
pub mod utils;
