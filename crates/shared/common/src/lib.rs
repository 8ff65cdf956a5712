//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified error handling for the command-line surface
//! - Environment and database configuration structures
//! - Default values for tracking tables and lock keys

pub mod config;
pub mod constants;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult};
