//! Financial projection calculator for battery storage in the aFRR market.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
/// Price trajectories, power derating, payback, NPV/IRR and reports.
pub mod model;
pub mod reference;
pub mod scenario;
