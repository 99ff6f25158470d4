//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the caller from a Bearer token or the session cookie.
//! - [`rbac::RequirePermission`] -- Requires a permission through the caller's roles.

pub mod auth;
pub mod rbac;
