//! Audit log vocabulary and detail redaction.
//!
//! Audit entries are append-only. Every mutating administrative action
//! records one entry; permission checks themselves are never logged here.

// ---------------------------------------------------------------------------
// Action constants
// ---------------------------------------------------------------------------

/// Known actions for audit log entries.
pub mod actions {
    pub const LOGIN: &str = "login";
    pub const LOGOUT: &str = "logout";
    pub const ROLE_GRANT: &str = "role_grant";
    pub const ROLE_REVOKE: &str = "role_revoke";
    pub const TWO_FACTOR_ENABLE: &str = "two_factor_enable";
    pub const TWO_FACTOR_DISABLE: &str = "two_factor_disable";
    pub const BACKUP_CODE_REDEEM: &str = "backup_code_redeem";
}

/// Resources that audit entries refer to.
pub mod resources {
    pub const SESSION: &str = "session";
    pub const USER_ROLE: &str = "user_role";
    pub const TWO_FACTOR: &str = "two_factor";
}

// ---------------------------------------------------------------------------
// Sensitive field redaction
// ---------------------------------------------------------------------------

/// Substrings of keys whose values never reach the audit table.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "token",
    "secret",
    "backup_code",
    "otp",
    "code",
    "authorization",
    "cookie",
];

const REDACTED: &str = "[REDACTED]";

/// Redact sensitive values from a JSON document, recursing into objects and
/// arrays. Key matching is case-insensitive and substring-based.
pub fn redact_sensitive_fields(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.iter()
                .map(|(key, val)| {
                    let lower = key.to_lowercase();
                    let val = if SENSITIVE_FIELDS.iter().any(|f| lower.contains(f)) {
                        serde_json::Value::String(REDACTED.to_string())
                    } else {
                        redact_sensitive_fields(val)
                    };
                    (key.clone(), val)
                })
                .collect(),
        ),
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(redact_sensitive_fields).collect())
        }
        other => other.clone(),
    }
}
