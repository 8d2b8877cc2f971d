//! Shared types, errors, and configuration for Parcela.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - The `YearMonth` calendar month (`YYYY-MM`)
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ErrorKind};
pub use types::{YearMonth, shift_months};
