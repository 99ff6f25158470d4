//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row plus the DTOs used to insert or filter it.

pub mod audit;
pub mod role;
pub mod session;
pub mod two_factor;
pub mod user;
