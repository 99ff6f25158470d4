//! Authentication and authorization primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access tokens carrying a roles claim, opaque session tokens.
//! - [`resolver`] -- the roles an identity holds (token fast path, store fallback).
//! - [`checker`] -- whether those roles grant a permission.
//! - [`two_factor`] -- TOTP enrollment, verification, and login challenges.

pub mod checker;
pub mod jwt;
pub mod password;
pub mod resolver;
pub mod two_factor;

#[cfg(test)]
pub(crate) mod test_store;
