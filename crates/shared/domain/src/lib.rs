//! Domain layer - HR reference types shared by the schema units.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! The migration crate derives column constraints and seed data from it.

pub mod constants;
pub mod employee;
pub mod error;

pub use constants::*;
pub use employee::EmployeeStatus;
pub use error::{DomainError, DomainResult};
