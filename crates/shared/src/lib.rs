//! Shared types, errors, and configuration for Dompet.
//!
//! This crate provides common types used across all other crates:
//! - Rupiah amount helpers on top of `Decimal`
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
