//! The result value of one exchange.
//!
//! # Design
//! Plain data with public fields: callers pattern-match or read fields
//! directly, and synthetic values are trivial to build in tests. The two
//! failure signals are correlated by the transport, not by this type:
//! `status_code == 0` always comes with `error` set, and a completed
//! exchange with a non-2xx status leaves `error` empty.

use std::collections::HashMap;

/// Outcome of a single request/response exchange.
#[derive(Debug, Clone, Default)]
pub struct Response {
    /// Numeric HTTP status; 0 until a status line was successfully read,
    /// which means "never reached the server."
    pub status_code: u16,

    /// Response payload; empty is valid (HEAD, 204). Not meaningful when
    /// `error` is set — aborted transfers discard any partial body.
    pub body: String,

    /// Response headers, names exactly as received; duplicate names resolve
    /// to the last occurrence.
    pub headers: HashMap<String, String>,

    /// Stage diagnostic when the exchange did not complete as a well-formed
    /// HTTP response.
    pub error: Option<String>,
}

impl Response {
    /// True iff the status is in [200, 300) and the exchange completed
    /// cleanly.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code) && self.error.is_none()
    }

    /// A response that failed before producing any status line.
    pub(crate) fn from_error(diagnostic: impl Into<String>) -> Self {
        Response {
            error: Some(diagnostic.into()),
            ..Response::default()
        }
    }
}
