//! Core types and shared functionality for coverfind.
//!
//! This crate provides:
//! - Request/result records for cover lookups
//! - Unified error types
//! - Configuration structures
//! - Local cover storage with deterministic file names

pub mod config;
pub mod error;
pub mod model;
pub mod storage;

pub use config::{AppConfig, ConfigError, STRATEGY_NAMES};
pub use error::Error;
pub use model::{CoverRequest, CoverResult};
pub use storage::CoverStore;
