use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ts_rs::TS;
use utoipa::ToSchema;

/// Role
///
/// The closed set of back-office roles. A profile row stores the role as free
/// text; anything that is not one of these three literals carries no capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Owner,
    Admin,
    Moderator,
}

/// ParseRoleError
///
/// Returned by `Role::from_str` for any value outside the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized role: {0:?}")]
pub struct ParseRoleError(pub String);

impl Role {
    pub const ALL: [Role; 3] = [Role::Owner, Role::Admin, Role::Moderator];

    /// parse
    ///
    /// Exact, case-sensitive match against the persisted literals.
    /// No trimming: `" admin"` is not a role.
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "owner" => Some(Role::Owner),
            "admin" => Some(Role::Admin),
            "moderator" => Some(Role::Moderator),
            _ => None,
        }
    }

    /// from_optional
    ///
    /// Normalizes whatever the data collaborator returned for `profiles.role`
    /// (absent, null or arbitrary text) into the enum.
    pub fn from_optional(value: Option<&str>) -> Option<Role> {
        value.and_then(Role::parse)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Moderator => "moderator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| ParseRoleError(s.to_string()))
    }
}

/// is_valid_role
///
/// True iff `value` is exactly `"owner"`, `"admin"` or `"moderator"`.
pub fn is_valid_role(value: &str) -> bool {
    Role::parse(value).is_some()
}
