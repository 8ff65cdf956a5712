//! Domain-level constants.
//!
//! These constants define the HR reference data and column limits.

// =============================================================================
// Employee Status
// =============================================================================

pub const STATUS_ONBOARDING: &str = "Onboarding";
pub const STATUS_ACTIVE: &str = "Active";
pub const STATUS_TERMINATING: &str = "Terminating";
pub const STATUS_TERMINATED: &str = "Terminated";
pub const STATUS_ON_LEAVE: &str = "On Leave";
pub const STATUS_VACATION: &str = "Vacation";

/// Longest stored status value fits comfortably in this column width
pub const STATUS_COLUMN_LENGTH: u32 = 32;

// =============================================================================
// Reference Data
// =============================================================================

/// Departments every installation starts with
pub const SEED_DEPARTMENT_NAMES: &[&str] = &[
    "Administration",
    "Human Resources",
    "Operations",
    "Compounding",
    "Shipping",
];

/// Maximum length of a department name
pub const DEPARTMENT_NAME_LENGTH: u32 = 100;

/// Maximum length of an onboarding template code
pub const TEMPLATE_CODE_LENGTH: u32 = 50;
