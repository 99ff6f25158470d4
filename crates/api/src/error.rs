use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use careerdesk_core::error::CoreError;
use careerdesk_core::two_factor::TwoFactorError;
use serde::Serialize;

/// Error type returned by every handler and extractor.
///
/// Responses always have the shape `{ "error": message, "code": CODE }`.
/// Anything that could leak internals (SQL, secrets, stack traces) is logged
/// and replaced with a generic 500.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    TwoFactor(#[from] TwoFactorError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// The 401 returned when no identity can be resolved.
    pub fn unauthenticated() -> Self {
        AppError::Core(CoreError::Unauthorized("Authentication required".into()))
    }
}

/// Wire form of an error.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

/// Status plus body, before serialization.
struct Classified {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl Classified {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let classified = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::TwoFactor(err) => classify_two_factor_error(err),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => Classified::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                Classified::internal()
            }
        };

        let body = ErrorBody {
            error: classified.message,
            code: classified.code,
        };
        (classified.status, Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> Classified {
    match err {
        CoreError::NotFound { entity, id } => Classified::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => Classified::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
        CoreError::Conflict(msg) => Classified::new(StatusCode::CONFLICT, "CONFLICT", msg),
        CoreError::Unauthorized(msg) => Classified::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
        CoreError::Forbidden(msg) => Classified::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            Classified::internal()
        }
    }
}

/// Code failures share one message whatever the cause (wrong secret, stale
/// step, replay).
fn classify_two_factor_error(err: &TwoFactorError) -> Classified {
    match err {
        TwoFactorError::NotConfigured | TwoFactorError::NotPending => {
            Classified::new(StatusCode::BAD_REQUEST, "TWO_FACTOR_STATE", err.to_string())
        }
        TwoFactorError::AlreadyEnabled => {
            Classified::new(StatusCode::CONFLICT, "CONFLICT", err.to_string())
        }
        TwoFactorError::InvalidCode => Classified::new(
            StatusCode::BAD_REQUEST,
            "INVALID_CODE",
            "Invalid verification code",
        ),
        TwoFactorError::Corrupt(_) | TwoFactorError::Store(_) => {
            tracing::error!(error = %err, "Two-factor failure");
            Classified::internal()
        }
    }
}

/// PostgreSQL SQLSTATEs with a client-facing meaning.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// `RowNotFound` and foreign-key violations are 404, unique violations 409.
/// Everything else is a sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> Classified {
    match err {
        sqlx::Error::RowNotFound => {
            Classified::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => Classified::new(
                StatusCode::CONFLICT,
                "CONFLICT",
                format!(
                    "Duplicate value violates unique constraint: {}",
                    db_err.constraint().unwrap_or("unknown")
                ),
            ),
            Some(FOREIGN_KEY_VIOLATION) => Classified::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Referenced record not found",
            ),
            _ => {
                tracing::error!(error = %db_err, "Database error");
                Classified::internal()
            }
        },
        other => {
            tracing::error!(error = %other, "Database error");
            Classified::internal()
        }
    }
}
