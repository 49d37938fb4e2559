//! Domain primitives shared by services, the HTTP layer and the CLI.
//!
//! Identities are resolved once per request and flow through every mutating
//! service call as an [`Actor`], which is what ends up in the audit trail.

pub mod audit;
pub mod lenient;

pub use audit::AuditAction;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role held by a user account.
///
/// Stored in the `users.role` column using its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    #[serde(rename = "School Nurse")]
    SchoolNurse,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::SchoolNurse => "School Nurse",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Admin" | "admin" => Ok(Self::Admin),
            "School Nurse" | "SchoolNurse" | "nurse" => Ok(Self::SchoolNurse),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Roles allowed to manage accounts, configuration and whole-database operations.
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Roles allowed to record clinical encounters.
pub const CLINICAL_STAFF: &[Role] = &[Role::Admin, Role::SchoolNurse];

/// The identity a request runs as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

impl Identity {
    /// Stand-in identity assigned to requests when single-user mode is enabled
    /// and no session token was presented.
    #[must_use]
    pub fn single_user_admin() -> Self {
        Self {
            id: 1,
            username: "admin".to_string(),
            role: Role::Admin,
        }
    }

    #[must_use]
    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        allowed.is_empty() || allowed.contains(&self.role)
    }
}

/// Who performed a mutation and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Option<i32>,
    pub address: String,
}

impl Actor {
    #[must_use]
    pub fn new(user_id: Option<i32>, address: impl Into<String>) -> Self {
        Self {
            user_id,
            address: address.into(),
        }
    }

    /// Actor for maintenance commands run from the command line.
    #[must_use]
    pub fn cli() -> Self {
        Self::new(None, "cli")
    }
}

impl From<(&Identity, &str)> for Actor {
    fn from((identity, address): (&Identity, &str)) -> Self {
        Self::new(Some(identity.id), address)
    }
}

/// Current UTC time in the text form SQLite's `date()` understands.
#[must_use]
pub fn timestamp_now() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_label() {
        assert_eq!("School Nurse".parse::<Role>().unwrap(), Role::SchoolNurse);
        assert_eq!(Role::SchoolNurse.to_string(), "School Nurse");
        assert!("Janitor".parse::<Role>().is_err());
    }

    #[test]
    fn empty_role_set_admits_everyone() {
        let nurse = Identity {
            id: 2,
            username: "nurse".to_string(),
            role: Role::SchoolNurse,
        };
        assert!(nurse.has_any_role(&[]));
        assert!(nurse.has_any_role(CLINICAL_STAFF));
        assert!(!nurse.has_any_role(ADMIN_ONLY));
    }

    #[test]
    fn timestamp_has_sqlite_shape() {
        let ts = timestamp_now();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[10..11], " ");
    }
}
