//! Newtype wrappers for domain identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! int_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

int_id!(
    /// Identifies a user account (student, supervisor, faculty or admin).
    UserId
);
int_id!(
    /// Identifies a submitted project.
    ProjectId
);
int_id!(
    /// Identifies a weekly progress update.
    ProgressUpdateId
);
int_id!(
    /// Identifies a final evaluation.
    EvaluationId
);
int_id!(
    /// Identifies a feedback entry.
    FeedbackId
);
