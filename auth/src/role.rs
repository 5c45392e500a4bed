use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Operator role carried in every token.
///
/// Roles are compared by equality only; there is no hierarchy between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Officer,
    PoliceStation,
    SuperUser,
}

/// Error for role name parsing failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    /// Wire and database name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Officer => "OFFICER",
            Role::PoliceStation => "POLICE_STATION",
            Role::SuperUser => "SUPER_USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OFFICER" => Ok(Role::Officer),
            "POLICE_STATION" => Ok(Role::PoliceStation),
            "SUPER_USER" => Ok(Role::SuperUser),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
