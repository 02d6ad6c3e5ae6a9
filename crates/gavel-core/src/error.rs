//! Error taxonomies for assignment resolution and judging.
//!
//! `JudgeError` is defined here so the executor can classify capability
//! failures for retry decisions without string matching.

use thiserror::Error;

/// Errors from the assignment resolver.
///
/// These are fatal to the resolve call and surface before any job starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Either side of the selection is empty.
    #[error("empty selection: {0}")]
    EmptySelection(&'static str),

    /// An explicitly selected submission id is not in the snapshot.
    #[error("unknown submission id: {0}")]
    UnknownSubmission(String),

    /// An explicitly selected judge id is not in the snapshot.
    #[error("unknown judge id: {0}")]
    UnknownJudge(String),
}

/// Errors from a judging capability invocation.
#[derive(Debug, Error)]
pub enum JudgeError {
    /// The invocation timed out.
    #[error("judging request timed out after {0}s")]
    Timeout(u64),

    /// A network/transport error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The judging service returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// The judging service returned an error response.
    #[error("judging service error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The capability produced a verdict outside pass/fail/inconclusive.
    #[error("malformed verdict: {0}")]
    MalformedVerdict(String),
}

impl JudgeError {
    /// Returns `true` if the failure may clear on retry.
    ///
    /// Malformed verdicts and authentication failures are permanent; server
    /// errors (5xx) are treated as transient, other API errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            JudgeError::Timeout(_) | JudgeError::Network(_) | JudgeError::RateLimited { .. } => {
                true
            }
            JudgeError::Api { status, .. } => *status >= 500,
            JudgeError::AuthenticationFailed(_) | JudgeError::MalformedVerdict(_) => false,
        }
    }

    /// Returns the retry-after delay in milliseconds, if the service sent one.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            JudgeError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(JudgeError::Timeout(60).is_transient());
        assert!(JudgeError::Network("connection reset".into()).is_transient());
        assert!(JudgeError::RateLimited { retry_after_ms: 100 }.is_transient());
        assert!(JudgeError::Api { status: 503, message: "unavailable".into() }.is_transient());
        assert!(!JudgeError::Api { status: 422, message: "bad request".into() }.is_transient());
        assert!(!JudgeError::AuthenticationFailed("bad key".into()).is_transient());
        assert!(!JudgeError::MalformedVerdict("maybe".into()).is_transient());
    }

    #[test]
    fn retry_after_hint() {
        let err = JudgeError::RateLimited { retry_after_ms: 5000 };
        assert_eq!(err.retry_after_ms(), Some(5000));
        assert_eq!(JudgeError::Timeout(1).retry_after_ms(), None);
    }
}
