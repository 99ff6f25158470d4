//! Permission identifiers.
//!
//! A permission is a `(resource, action)` pair whose id is rendered as
//! `resource:action`. The catalogue is seeded by migration; the constants
//! below name the ones the API enforces itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const USERS_MANAGE: &str = "users:manage";
pub const AUDIT_LOGS_READ: &str = "audit_logs:read";

/// Longest permission id accepted from callers.
pub const MAX_PERMISSION_ID_LEN: usize = 128;

/// Verb half of a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    Create,
    Read,
    Update,
    Delete,
    Manage,
}

impl PermissionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            PermissionAction::Create => "create",
            PermissionAction::Read => "read",
            PermissionAction::Update => "update",
            PermissionAction::Delete => "delete",
            PermissionAction::Manage => "manage",
        }
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(PermissionAction::Create),
            "read" => Ok(PermissionAction::Read),
            "update" => Ok(PermissionAction::Update),
            "delete" => Ok(PermissionAction::Delete),
            "manage" => Ok(PermissionAction::Manage),
            other => Err(CoreError::Validation(format!(
                "Unknown permission action '{other}'"
            ))),
        }
    }
}

/// Build the canonical id for a resource/action pair.
pub fn permission_id(resource: &str, action: PermissionAction) -> String {
    format!("{resource}:{action}")
}

/// Split a permission id into its resource and action.
///
/// Returns `None` for anything that is not `resource:action` with a known
/// action and a lowercase `[a-z_]` resource. Callers treat `None` as an
/// unknown permission, which is a denial rather than an error.
pub fn parse_permission_id(id: &str) -> Option<(&str, PermissionAction)> {
    if id.is_empty() || id.len() > MAX_PERMISSION_ID_LEN {
        return None;
    }
    let (resource, action) = id.split_once(':')?;
    if resource.is_empty()
        || !resource
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == '_')
    {
        return None;
    }
    let action = action.parse().ok()?;
    Some((resource, action))
}
