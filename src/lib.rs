//! Household energy-consumption optimizer.
//!
//! The engine takes a snapshot of appliance records (rated power, daily
//! usage hours) and a price per kWh, and derives a reduced usage-hours
//! configuration together with tariff pricing, savings aggregation and a
//! stochastic consumption projection. Persistence and the serving layer
//! are the caller's concern.

pub mod config;
pub mod domain;
pub mod optimizer;
pub mod projection;
pub mod recommendations;
pub mod report;
pub mod tariff;
pub mod telemetry;

pub use domain::{ApplianceKind, ApplianceRecord, Interval};
pub use optimizer::{OptimizationEngine, DEFAULT_PROJECTION_DAYS, DEFAULT_SAVINGS_TARGET};
pub use report::SavingsReport;
