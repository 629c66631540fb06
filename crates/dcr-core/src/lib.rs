//! DCR Core - Domain models, identifier scheme, statistics, and configuration
//!
//! This crate contains the core domain logic and port definitions for the DCR
//! field-reporting system.

pub mod config;
pub mod error;
pub mod ident;
pub mod metrics;
pub mod models;
pub mod ports;
pub mod stats;

pub use error::{DcrError, Result};
