//! Common types and utilities for review metrics

pub mod config;
pub mod error;
pub mod models;

pub use config::{Config, TeamConfig};
pub use error::{Error, Result};
