//! Core building blocks for DemoStat.
//!
//! This crate hosts the shared error type and the data types passed between
//! the statistical procedures and their hosts (CLI, report generators).

pub mod error;
pub mod types;

pub use error::{Error, Result};
