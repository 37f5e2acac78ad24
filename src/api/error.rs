use std::fmt;
use thiserror::Error;

/// Structured classification of backend failures. Inferred once, centrally,
/// from the response status and message; pages only ever branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Duplicate,
    NotFound,
    Forbidden,
    SessionExpired,
    Backend,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Duplicate => "duplicate",
            Self::NotFound => "not found",
            Self::Forbidden => "forbidden",
            Self::SessionExpired => "session expired",
            Self::Backend => "backend",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("cannot connect to the backend: {0}")]
    Connection(String),
    #[error("backend rejected the request ({kind}): {message}")]
    Status {
        kind: ErrorKind,
        status: u16,
        message: String,
    },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let message = backend_message(body);
        Self::Status {
            kind: classify(status, &message),
            status,
            message,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Status { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// The single kind → copy table. Everything user-facing goes through
    /// here; raw backend text only leaks for the catch-all kind.
    pub fn user_message(&self) -> String {
        match self {
            Self::Connection(_) => {
                "Cannot connect to the backend. Check your connection and try again.".to_string()
            }
            Self::Decode(_) => "The backend returned an unreadable response.".to_string(),
            Self::Status { kind, message, .. } => match kind {
                ErrorKind::Duplicate if message.contains("national_id") => {
                    "A record with this national ID already exists.".to_string()
                }
                ErrorKind::Duplicate => "A matching record already exists.".to_string(),
                ErrorKind::NotFound => "The requested record could not be found.".to_string(),
                ErrorKind::Forbidden => {
                    "You do not have permission to perform this action.".to_string()
                }
                ErrorKind::SessionExpired => {
                    "Your session has expired. Please log in again.".to_string()
                }
                ErrorKind::Backend => message.clone(),
            },
        }
    }
}

/// Pull the `message`/`error` field out of a JSON error body, falling back
/// to the raw text.
fn backend_message(body: &[u8]) -> String {
    let raw = String::from_utf8_lossy(body);
    if let Ok(parsed) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(text) = parsed.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    raw.trim().to_string()
}

fn classify(status: u16, message: &str) -> ErrorKind {
    let lowered = message.to_ascii_lowercase();
    if status == 401 || lowered.contains("expired") || lowered.contains("invalid token") {
        return ErrorKind::SessionExpired;
    }
    if status == 403 || lowered.contains("forbidden") {
        return ErrorKind::Forbidden;
    }
    if status == 404 || lowered.contains("not found") {
        return ErrorKind::NotFound;
    }
    if status == 409 || lowered.contains("duplicate entry") || lowered.contains("already exists") {
        return ErrorKind::Duplicate;
    }
    ErrorKind::Backend
}

#[cfg(test)]
mod tests {
    use super::{ApiError, ErrorKind};

    #[test]
    fn duplicate_national_id_gets_friendly_copy() {
        let body = br#"{"message":"Duplicate entry 'AM12345678901X' for key 'national_id'"}"#;
        let err = ApiError::from_response(500, body);
        assert_eq!(err.kind(), Some(ErrorKind::Duplicate));
        assert_eq!(
            err.user_message(),
            "A record with this national ID already exists."
        );
    }

    #[test]
    fn unauthorized_maps_to_session_expired() {
        let err = ApiError::from_response(401, br#"{"error":"jwt malformed"}"#);
        assert_eq!(err.kind(), Some(ErrorKind::SessionExpired));
    }

    #[test]
    fn unknown_errors_fall_back_to_the_backend_message() {
        let err = ApiError::from_response(500, br#"{"message":"ledger is on fire"}"#);
        assert_eq!(err.kind(), Some(ErrorKind::Backend));
        assert_eq!(err.user_message(), "ledger is on fire");
    }

    #[test]
    fn non_json_bodies_are_used_verbatim() {
        let err = ApiError::from_response(404, b"no such client");
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    }
}
