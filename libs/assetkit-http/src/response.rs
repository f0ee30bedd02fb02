use bytes::Bytes;
use http::{Response, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;

use crate::error::HttpError;

/// Bytes of a failed response kept for `HttpError::HttpStatus`.
const STATUS_PREVIEW_LIMIT: usize = 8 * 1024;

/// Body type produced by the client stack.
pub type ResponseBody =
    http_body_util::combinators::BoxBody<Bytes, Box<dyn std::error::Error + Send + Sync>>;

/// Answer to a sent request. Every body read is capped at the client's
/// `max_body_size`.
#[derive(Debug)]
pub struct HttpResponse {
    pub(crate) inner: Response<ResponseBody>,
    pub(crate) max_body_size: usize,
}

impl HttpResponse {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// `HttpError::HttpStatus` for non-2xx, without reading the body.
    ///
    /// # Errors
    /// Returns `HttpError::HttpStatus` with an empty preview.
    pub fn error_for_status(self) -> Result<Self, HttpError> {
        if self.status().is_success() {
            Ok(self)
        } else {
            Err(HttpError::HttpStatus {
                status: self.status(),
                body_preview: String::new(),
                content_type: content_type(&self.inner),
            })
        }
    }

    /// Whole body, whatever the status.
    ///
    /// # Errors
    /// Returns `HttpError::BodyTooLarge` past the limit and
    /// `HttpError::Transport` when the stream breaks.
    pub async fn bytes(self) -> Result<Bytes, HttpError> {
        collect(self.inner, self.max_body_size).await
    }

    /// Whole body of a 2xx answer.
    ///
    /// # Errors
    /// Returns `HttpError::HttpStatus` carrying a body preview for non-2xx,
    /// otherwise the errors of [`bytes`](Self::bytes).
    pub async fn checked_bytes(self) -> Result<Bytes, HttpError> {
        let status = self.status();
        if status.is_success() {
            return self.bytes().await;
        }

        let content_type = content_type(&self.inner);
        let limit = self.max_body_size.min(STATUS_PREVIEW_LIMIT);
        let body_preview = match collect(self.inner, limit).await {
            Ok(body) => String::from_utf8_lossy(&body).into_owned(),
            // The status matters more than the body
            Err(HttpError::BodyTooLarge { .. }) => "<body too large for preview>".to_owned(),
            Err(e) => return Err(e),
        };
        Err(HttpError::HttpStatus {
            status,
            body_preview,
            content_type,
        })
    }

    /// Decode a 2xx JSON body.
    ///
    /// # Errors
    /// As [`checked_bytes`](Self::checked_bytes), plus `HttpError::Json`.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, HttpError> {
        let body = self.checked_bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn content_type(response: &Response<ResponseBody>) -> Option<String> {
    response
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned)
}

async fn collect(response: Response<ResponseBody>, limit: usize) -> Result<Bytes, HttpError> {
    let mut body = std::pin::pin!(response.into_body());
    let mut buf = Vec::new();

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(HttpError::Transport)?;
        let Some(chunk) = frame.data_ref() else {
            continue;
        };
        let actual = buf.len() + chunk.len();
        if actual > limit {
            return Err(HttpError::BodyTooLarge { limit, actual });
        }
        buf.extend_from_slice(chunk);
    }
    Ok(Bytes::from(buf))
}
