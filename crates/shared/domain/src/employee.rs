//! Employee status lifecycle.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    STATUS_ACTIVE, STATUS_ONBOARDING, STATUS_ON_LEAVE, STATUS_TERMINATED, STATUS_TERMINATING,
    STATUS_VACATION,
};
use crate::error::DomainError;

/// Employment status of an employee.
///
/// The stored representation is the exact string returned by [`as_str`],
/// and the database column only admits values from [`EmployeeStatus::ALL`].
///
/// [`as_str`]: EmployeeStatus::as_str
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EmployeeStatus {
    #[default]
    Onboarding,
    Active,
    Terminating,
    Terminated,
    OnLeave,
    Vacation,
}

impl EmployeeStatus {
    /// Every status, in lifecycle order
    pub const ALL: [EmployeeStatus; 6] = [
        EmployeeStatus::Onboarding,
        EmployeeStatus::Active,
        EmployeeStatus::Terminating,
        EmployeeStatus::Terminated,
        EmployeeStatus::OnLeave,
        EmployeeStatus::Vacation,
    ];

    /// Stored string for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Onboarding => STATUS_ONBOARDING,
            EmployeeStatus::Active => STATUS_ACTIVE,
            EmployeeStatus::Terminating => STATUS_TERMINATING,
            EmployeeStatus::Terminated => STATUS_TERMINATED,
            EmployeeStatus::OnLeave => STATUS_ON_LEAVE,
            EmployeeStatus::Vacation => STATUS_VACATION,
        }
    }

    /// Stored strings of all statuses, for column constraints
    pub fn allowed_values() -> Vec<&'static str> {
        Self::ALL.iter().map(EmployeeStatus::as_str).collect()
    }

    /// Whether the employee still belongs to the workforce
    pub fn is_employed(&self) -> bool {
        !matches!(self, EmployeeStatus::Terminated)
    }
}

impl FromStr for EmployeeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Unknown employee status '{}'", s)))
    }
}

impl TryFrom<String> for EmployeeStatus {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<EmployeeStatus> for String {
    fn from(status: EmployeeStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
