//! Shared response envelope types for API handlers.
//!
//! Admin responses use a `{ "data": ... }` envelope. The access-check
//! endpoints (`/auth/roles`, `/auth/permission-check`, `/auth/2fa/*`) return
//! their documented flat shapes instead.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
