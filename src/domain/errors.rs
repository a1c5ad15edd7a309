use thiserror::Error;

/// Shown when the service gives no usable message of its own.
pub const SERVER_ERROR_FALLBACK: &str = "Terjadi kesalahan server.";
/// Shown when the request never produced a response.
pub const TRANSPORT_ERROR_FALLBACK: &str = "Gagal memproses teks.";
/// Shown when a success response has no `result` string.
pub const MALFORMED_RESPONSE_MESSAGE: &str = "Respons server tidak valid.";

/// Why a call to the rewriting service failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// No response at all (connection refused, timeout, DNS)
    Transport,
    /// The service answered with a non-success HTTP status
    Status(u16),
    /// Success status, but the body did not carry a `result` string
    MalformedResponse,
    /// The background worker was gone before the request could run
    WorkerUnavailable,
}

/// Failure of a rewrite request, carrying the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn transport() -> Self {
        Self {
            kind: ServiceErrorKind::Transport,
            message: TRANSPORT_ERROR_FALLBACK.to_string(),
        }
    }

    /// Builds a status failure, preferring the service's own `detail` text.
    pub fn status(code: u16, detail: Option<String>) -> Self {
        let message = detail
            .filter(|detail| !detail.trim().is_empty())
            .unwrap_or_else(|| SERVER_ERROR_FALLBACK.to_string());
        Self {
            kind: ServiceErrorKind::Status(code),
            message,
        }
    }

    pub fn malformed() -> Self {
        Self {
            kind: ServiceErrorKind::MalformedResponse,
            message: MALFORMED_RESPONSE_MESSAGE.to_string(),
        }
    }

    pub fn worker_unavailable() -> Self {
        Self {
            kind: ServiceErrorKind::WorkerUnavailable,
            message: TRANSPORT_ERROR_FALLBACK.to_string(),
        }
    }
}

/// Failure of a submission attempt.
///
/// Every variant has already been reported to the notification sink by the
/// time the caller sees it, except [`SubmitError::InFlight`], which is a
/// silent rejection of an overlapping submit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("input text is empty")]
    EmptyInput,
    #[error("input has {count} words, the free tier allows {limit}")]
    LimitExceeded { count: usize, limit: usize },
    #[error("a submission is already in flight")]
    InFlight,
    #[error("rewrite failed: {0}")]
    Service(#[from] ServiceError),
}

/// Failure to place text on the system clipboard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write failed: {0}")]
    Write(String),
}

pub type SubmitResult<T> = Result<T, SubmitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_prefers_detail() {
        let err = ServiceError::status(400, Some("boom".to_string()));
        assert_eq!(err.kind, ServiceErrorKind::Status(400));
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_status_error_falls_back_on_blank_detail() {
        assert_eq!(ServiceError::status(500, None).message, SERVER_ERROR_FALLBACK);
        assert_eq!(
            ServiceError::status(500, Some("  ".to_string())).message,
            SERVER_ERROR_FALLBACK
        );
    }

    #[test]
    fn test_submit_error_wraps_service_error() {
        let err: SubmitError = ServiceError::transport().into();
        assert_eq!(err.to_string(), format!("rewrite failed: {TRANSPORT_ERROR_FALLBACK}"));
    }
}
