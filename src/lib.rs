//! Batch allocator assigning pupils to after-school clubs from ranked
//! preference submissions, subject to seat limits, one-club-per-day terms,
//! and repeat rules across terms.

pub mod allocation;
pub mod config;
pub mod error;
pub mod generator;
pub mod intake;
pub mod report;
pub mod telemetry;
