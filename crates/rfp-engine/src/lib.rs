//! Response lifecycle tracking and weighted vendor evaluation for an RFP marketplace.
//!
//! Vendors answer templated questions per RFP ("subject"); answers move through a monotonic
//! status machine, are reused across subjects through a global fallback store, and are
//! debounced before persistence. Buyers open comparison sessions that allocate per-section
//! weights and turn star ratings into weighted scores.

pub mod catalog;
pub mod comparison;
pub mod config;
pub mod error;
pub mod responses;
pub mod telemetry;
