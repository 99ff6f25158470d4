//! The fixed role enumeration and role-set helpers.
//!
//! Role names must match the CHECK constraint and seed rows in
//! `20260301000002_create_roles_and_permissions.sql`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ROLE_USER: &str = "user";
pub const ROLE_SUPPORT: &str = "support";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

/// A role an identity can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    User,
    Support,
    Editor,
    Admin,
    SuperAdmin,
}

impl RoleName {
    /// Every role, in declaration order.
    pub const ALL: [RoleName; 5] = [
        RoleName::User,
        RoleName::Support,
        RoleName::Editor,
        RoleName::Admin,
        RoleName::SuperAdmin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RoleName::User => ROLE_USER,
            RoleName::Support => ROLE_SUPPORT,
            RoleName::Editor => ROLE_EDITOR,
            RoleName::Admin => ROLE_ADMIN,
            RoleName::SuperAdmin => ROLE_SUPER_ADMIN,
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known role names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for RoleName {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_USER => Ok(RoleName::User),
            ROLE_SUPPORT => Ok(RoleName::Support),
            ROLE_EDITOR => Ok(RoleName::Editor),
            ROLE_ADMIN => Ok(RoleName::Admin),
            ROLE_SUPER_ADMIN => Ok(RoleName::SuperAdmin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Order-irrelevant set of roles held by an identity.
pub type RoleSet = BTreeSet<RoleName>;

/// Parse role names into a [`RoleSet`], dropping anything unrecognized.
///
/// Token claims and database rows both pass through here, so an unexpected
/// name never becomes a grant.
pub fn parse_role_set<I, S>(names: I) -> RoleSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| match name.as_ref().parse::<RoleName>() {
            Ok(role) => Some(role),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unrecognized role name");
                None
            }
        })
        .collect()
}

/// Render a role set as sorted role name strings.
pub fn role_names(roles: &RoleSet) -> Vec<String> {
    roles.iter().map(|r| r.as_str().to_string()).collect()
}
