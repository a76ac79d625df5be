//! User domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The single role a user account holds.
///
/// Wire format: SCREAMING_SNAKE_CASE string (`"ADMIN"`, `"FACULTY"`, `"SUPERVISOR"`, `"STUDENT"`).
///
/// `Supervisor` is the canonical supervisory role. `Faculty` is kept as a wire value for
/// accounts created under the older naming; every authorization decision goes through
/// [`Role::is_supervisory`] or [`Role::is_staff`], so the two never diverge in behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Faculty,
    Supervisor,
    Student,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Faculty, Role::Supervisor, Role::Student];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Faculty => "FACULTY",
            Self::Supervisor => "SUPERVISOR",
            Self::Student => "STUDENT",
        }
    }

    /// Roles a student may be assigned to as supervisor.
    pub fn is_supervisory(self) -> bool {
        matches!(self, Self::Faculty | Self::Supervisor)
    }

    /// Supervisory roles plus `Admin`: allowed to approve, evaluate and give feedback.
    pub fn is_staff(self) -> bool {
        self == Self::Admin || self.is_supervisory()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownRole(s.to_owned()))
    }
}

/// Display name used for supervisor snapshots and project listings.
pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{first_name} {last_name}")
}
