pub mod access;
pub mod admin;
pub mod audit;
pub mod auth;
pub mod two_factor;
