//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod audit_repo;
pub mod permission_repo;
pub mod role_repo;
pub mod session_repo;
pub mod two_factor_repo;
pub mod user_repo;

pub use audit_repo::AuditLogRepo;
pub use permission_repo::PermissionRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use two_factor_repo::TwoFactorRepo;
pub use user_repo::UserRepo;
