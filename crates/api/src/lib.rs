//! CareerDesk access service library.
//!
//! Exposes the building blocks (config, state, error handling, the role
//! resolver and permission checker, two-factor service, routes) so the
//! integration tests and the binary entrypoint share them.

pub mod audit;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
