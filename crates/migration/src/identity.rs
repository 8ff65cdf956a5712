//! Orderable unit identities.
//!
//! Identities follow the module naming convention used for units:
//! `{kind}{YYYYMMDD}_{NNNNNN}_{description}`, where `kind` is `m` for schema
//! migrations and `s` for seeds. Plain string order on the whole identity is
//! the execution order.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::MigrationError;

static IDENTITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ms][0-9]{8}_[0-9]{6}_[a-z][a-z0-9_]*$").expect("identity pattern is valid")
});

/// Globally unique, totally ordered name of a unit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MigrationId(String);

impl MigrationId {
    /// Validate and wrap an identity string.
    pub fn parse(value: &str) -> Result<Self, MigrationError> {
        if IDENTITY_PATTERN.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(MigrationError::InvalidIdentity(value.to_string()))
        }
    }

    /// Wrap an identity read back from a tracking table.
    ///
    /// Stored identities are not re-validated so that a history written by an
    /// older naming scheme can still be listed and reported.
    pub(crate) fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Date-and-sequence prefix, e.g. `20240315_000001`
    pub fn version(&self) -> &str {
        self.0.get(1..16).unwrap_or_default()
    }

    /// Human-readable part after the version prefix
    pub fn description(&self) -> &str {
        self.0.get(17..).unwrap_or_default()
    }
}

impl FromStr for MigrationId {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for MigrationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MigrationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Comma-separated identities for error messages.
pub(crate) fn join_ids(ids: &[MigrationId]) -> String {
    if ids.is_empty() {
        return "none".to_string();
    }
    ids.iter()
        .map(MigrationId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
