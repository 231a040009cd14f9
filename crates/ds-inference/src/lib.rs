//! Statistical procedures for DemoStat.
//!
//! This crate hosts the pure computations behind the reports:
//! - chi-squared goodness-of-fit of observed counts against population share
//! - univariate OLS trend fitting with inference statistics
//! - tabulation of raw event labels into per-category counts
//!
//! Everything here is synchronous, deterministic, and side-effect free.

pub mod proportion;
pub mod regression;
pub mod tabulate;
