use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A permission grant from the platform's fixed role set.
///
/// Serialized with its wire id (`ADMIN`, `MODERATOR`, `REDACTOR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Moderator,
    Redactor,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl UserRole {
    /// Every known role, in display order.
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::Moderator, UserRole::Redactor];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Moderator => "MODERATOR",
            UserRole::Redactor => "REDACTOR",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "Administrator",
            UserRole::Moderator => "Moderator",
            UserRole::Redactor => "Redactor",
        }
    }

    /// Holders of a privileged role cannot have roles revoked from the console.
    pub fn is_privileged(&self) -> bool {
        match self {
            UserRole::Admin => true,
            UserRole::Moderator | UserRole::Redactor => false,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
