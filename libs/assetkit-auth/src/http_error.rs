use assetkit_http::HttpError;

/// One-line rendering of an [`HttpError`] for logs and `/ping` text, led by
/// the upstream it concerns (`"OAuth2 token"`, `"UAA"`, `"Asset"`).
///
/// Upstream bodies never appear: a status error renders as its status only.
#[must_use]
pub fn format_http_error(e: &HttpError, prefix: &str) -> String {
    let detail = match e {
        HttpError::HttpStatus { status, .. } => format!("HTTP {status}"),
        HttpError::Timeout(after) => format!("request timed out after {after:?}"),
        HttpError::BodyTooLarge { limit, actual } => {
            format!("response too large: limit {limit} bytes, got {actual} bytes")
        }
        HttpError::Overloaded => "request rejected: client overloaded".to_owned(),
        HttpError::ServiceClosed => "client unavailable".to_owned(),
        HttpError::InvalidUri { url, reason, .. } => format!("invalid URL '{url}': {reason}"),
        HttpError::InvalidScheme { scheme, reason } => {
            format!("invalid scheme '{scheme}': {reason}")
        }
        HttpError::Json(err) => format!("JSON parse failed: {err}"),
        HttpError::FormEncode(err) => format!("form encode error: {err}"),
        HttpError::Transport(err) => format!("transport error: {err}"),
        HttpError::Tls(err) => format!("TLS error: {err}"),
        HttpError::RequestBuild(err) => format!("request build failed: {err}"),
        HttpError::InvalidHeaderName(err) => format!("invalid header name: {err}"),
        HttpError::InvalidHeaderValue(err) => format!("invalid header value: {err}"),
    };
    format!("{prefix} {detail}")
}
