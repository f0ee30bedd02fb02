use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, Method, Request, Uri};
use http_body_util::Full;
use serde::Serialize;
use tower::Service;

use crate::client::{HttpClient, from_buffer_error, reserve_slot};
use crate::config::TransportSecurity;
use crate::error::{HttpError, InvalidUriKind};
use crate::response::HttpResponse;

/// A request being assembled; nothing is sent before [`send`](Self::send).
///
/// A bad header is remembered and reported by the next fallible call, so
/// header calls chain without `?`.
///
/// ```ignore
/// let resp = client
///     .post("https://uaa.example.com/oauth/clients")
///     .header("accept", "application/json")
///     .json(&registration)?
///     .send()
///     .await?;
/// ```
#[must_use = "a request is only sent by .send()"]
pub struct RequestBuilder {
    client: HttpClient,
    method: Method,
    url: String,
    headers: HeaderMap,
    /// Default content type and encoded payload.
    body: Option<(&'static str, Bytes)>,
    error: Option<HttpError>,
}

impl RequestBuilder {
    pub(crate) fn new(client: HttpClient, method: Method, url: &str) -> Self {
        Self {
            client,
            method,
            url: url.to_owned(),
            headers: HeaderMap::new(),
            body: None,
            error: None,
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            (Err(e), _) => self.error = Some(e.into()),
            (_, Err(e)) => self.error = Some(e.into()),
        }
        self
    }

    /// JSON payload, `application/json` unless a content type was set.
    ///
    /// # Errors
    /// Returns a pending header error or `HttpError::Json`.
    pub fn json<T: Serialize + ?Sized>(self, payload: &T) -> Result<Self, HttpError> {
        let encoded = serde_json::to_vec(payload)?;
        self.with_body("application/json", encoded.into())
    }

    /// Form payload, `application/x-www-form-urlencoded` unless a content
    /// type was set.
    ///
    /// # Errors
    /// Returns a pending header error or `HttpError::FormEncode`.
    pub fn form(self, fields: &[(&str, &str)]) -> Result<Self, HttpError> {
        let encoded = serde_urlencoded::to_string(fields)?;
        self.with_body("application/x-www-form-urlencoded", encoded.into())
    }

    fn with_body(mut self, content_type: &'static str, body: Bytes) -> Result<Self, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.body = Some((content_type, body));
        Ok(self)
    }

    /// Send and wait for the response head. Any status comes back as `Ok`.
    ///
    /// # Errors
    /// Returns `HttpError` for a pending header error, a refused URL, a full
    /// request queue, a timeout or a transport failure.
    pub async fn send(mut self) -> Result<HttpResponse, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        let uri = check_url(&self.url, self.client.transport)?;

        let body = match self.body {
            Some((content_type, body)) => {
                self.headers
                    .entry(CONTENT_TYPE)
                    .or_insert(HeaderValue::from_static(content_type));
                body
            }
            None => Bytes::new(),
        };

        let mut request = Request::builder().method(self.method).uri(uri);
        if let Some(headers) = request.headers_mut() {
            *headers = self.headers;
        }
        let request = request.body(Full::new(body))?;

        let mut service = self.client.service;
        reserve_slot(&mut service).await?;
        let inner = service.call(request).await.map_err(from_buffer_error)?;

        Ok(HttpResponse {
            inner,
            max_body_size: self.client.max_body_size,
        })
    }
}

/// Absolute `https://` URL, or `http://` when the client allows it.
fn check_url(url: &str, transport: TransportSecurity) -> Result<Uri, HttpError> {
    let invalid = |kind, reason: &str| HttpError::InvalidUri {
        url: url.to_owned(),
        kind,
        reason: reason.to_owned(),
    };

    let uri: Uri = url
        .parse()
        .map_err(|e: http::uri::InvalidUri| invalid(InvalidUriKind::ParseError, &e.to_string()))?;
    if uri.authority().is_none() {
        return Err(invalid(InvalidUriKind::MissingAuthority, "no host"));
    }

    let refused = |scheme: &str, reason: &str| HttpError::InvalidScheme {
        scheme: scheme.to_owned(),
        reason: reason.to_owned(),
    };
    match (uri.scheme_str(), transport) {
        (Some("https"), _) | (Some("http"), TransportSecurity::AllowInsecureHttp) => Ok(uri),
        (Some("http"), TransportSecurity::TlsOnly) => {
            Err(refused("http", "HTTPS required, insecure HTTP is not enabled"))
        }
        (Some(other), _) => Err(refused(other, "only http and https are supported")),
        (None, _) => Err(invalid(InvalidUriKind::MissingScheme, "no scheme")),
    }
}
