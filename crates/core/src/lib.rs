//! Domain building blocks for the CareerDesk access service.
//!
//! This crate has no database or HTTP dependencies so the same rules apply
//! to the API server, repository layer, and tests.

pub mod audit;
pub mod error;
pub mod hashing;
pub mod permissions;
pub mod policy;
pub mod roles;
pub mod two_factor;
pub mod types;
