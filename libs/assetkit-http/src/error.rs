use std::time::Duration;

use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Why a URL was refused before sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidUriKind {
    ParseError,
    MissingAuthority,
    MissingScheme,
}

/// Failure of an outbound call.
///
/// Request-side variants mean nothing was sent; see
/// [`is_request_error`](Self::is_request_error).
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("cannot build request: {0}")]
    RequestBuild(#[from] http::Error),

    #[error("bad header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    #[error("bad header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// Connect, I/O or protocol failure below HTTP, or a failed token renewal.
    #[error("transport failure: {0}")]
    Transport(#[source] BoxedSource),

    #[error("TLS setup failed: {0}")]
    Tls(#[source] BoxedSource),

    #[error("body exceeds {limit} bytes (read {actual})")]
    BodyTooLarge { limit: usize, actual: usize },

    /// Non-2xx answer. `body_preview` is truncated and may hold upstream
    /// diagnostics; keep it out of user-facing text unless intended.
    #[error("upstream answered {status}: {body_preview}")]
    HttpStatus {
        status: http::StatusCode,
        body_preview: String,
        content_type: Option<String>,
    },

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("form encoding: {0}")]
    FormEncode(#[from] serde_urlencoded::ser::Error),

    /// The request queue was full.
    #[error("client overloaded, request refused")]
    Overloaded,

    /// The buffer worker has stopped.
    #[error("client closed")]
    ServiceClosed,

    #[error("cannot use URL '{url}': {reason}")]
    InvalidUri {
        url: String,
        kind: InvalidUriKind,
        reason: String,
    },

    #[error("scheme '{scheme}' refused: {reason}")]
    InvalidScheme { scheme: String, reason: String },
}

impl HttpError {
    /// `true` when the failure happened while assembling the request.
    #[must_use]
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::RequestBuild(_)
                | Self::InvalidHeaderName(_)
                | Self::InvalidHeaderValue(_)
                | Self::Json(_)
                | Self::FormEncode(_)
                | Self::InvalidUri { .. }
                | Self::InvalidScheme { .. }
        )
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn transport_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = HttpError::Transport(Box::new(io));

        let source = err.source().unwrap();
        let io = source.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::ConnectionRefused);
    }

    #[test]
    fn request_side_errors_are_classified() {
        let bad_header = http::header::HeaderName::try_from("bad header").unwrap_err();
        assert!(HttpError::InvalidHeaderName(bad_header).is_request_error());
        assert!(
            HttpError::InvalidScheme {
                scheme: "ftp".into(),
                reason: "not http".into(),
            }
            .is_request_error()
        );

        assert!(!HttpError::Timeout(Duration::from_secs(1)).is_request_error());
        assert!(!HttpError::Overloaded.is_request_error());
        assert!(
            !HttpError::HttpStatus {
                status: http::StatusCode::BAD_GATEWAY,
                body_preview: String::new(),
                content_type: None,
            }
            .is_request_error()
        );
    }

    #[test]
    fn status_message_names_status() {
        let err = HttpError::HttpStatus {
            status: http::StatusCode::NOT_FOUND,
            body_preview: "no zone".into(),
            content_type: None,
        };
        assert_eq!(err.to_string(), "upstream answered 404 Not Found: no zone");
    }
}
