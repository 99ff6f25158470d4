//! Fail-closed error policy for authorization reads.
//!
//! Any failure while deciding access collapses to the type's default: an
//! empty role list, an empty set, or `false`. The cause is logged so
//! operators can tell "no such permission" from "store unreachable", which
//! the response body deliberately does not.

use std::fmt;

/// Authorization operations that run under the fail-closed policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedOperation {
    ResolveRoles,
    CheckPermission,
}

impl GuardedOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            GuardedOperation::ResolveRoles => "resolve_roles",
            GuardedOperation::CheckPermission => "check_permission",
        }
    }
}

impl fmt::Display for GuardedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collapse a fallible authorization result to its safe default.
pub trait FailClosed<T> {
    fn or_fail_closed(self, operation: GuardedOperation) -> T;
}

impl<T, E> FailClosed<T> for Result<T, E>
where
    T: Default,
    E: fmt::Display,
{
    fn or_fail_closed(self, operation: GuardedOperation) -> T {
        match self {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    operation = %operation,
                    error = %e,
                    "Authorization dependency failed, denying",
                );
                T::default()
            }
        }
    }
}
