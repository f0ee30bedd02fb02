use std::time::Duration;

use bytes::Bytes;
use http::{HeaderValue, Response};
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use tower::buffer::Buffer;
use tower::timeout::TimeoutLayer;
use tower::util::BoxCloneService;
use tower::{ServiceBuilder, ServiceExt};

use crate::client::HttpClient;
use crate::config::{HttpClientConfig, TransportSecurity};
use crate::error::HttpError;
use crate::response::ResponseBody;
use crate::tls;
use crate::user_agent::UserAgentLayer;

/// The stack below the request queue, as seen by an auth wrapper.
pub type InnerService =
    BoxCloneService<http::Request<Full<Bytes>>, http::Response<ResponseBody>, HttpError>;

type AuthWrapper = Box<dyn FnOnce(InnerService) -> InnerService + Send>;

/// Turns an [`HttpClientConfig`] into an [`HttpClient`].
///
/// Layers, outermost first: request queue, optional auth, timeout,
/// `User-Agent`, hyper.
pub struct HttpClientBuilder {
    config: HttpClientConfig,
    auth: Option<AuthWrapper>,
}

impl HttpClientBuilder {
    #[must_use]
    pub fn with_config(config: HttpClientConfig) -> Self {
        Self { config, auth: None }
    }

    /// Wrap the stack below the queue, e.g. to add `Authorization`.
    /// A second call replaces the first.
    #[must_use]
    pub fn with_auth_layer(
        mut self,
        wrap: impl FnOnce(InnerService) -> InnerService + Send + 'static,
    ) -> Self {
        self.auth = Some(Box::new(wrap));
        self
    }

    /// Needs a Tokio runtime: the request queue runs on a spawned task.
    ///
    /// # Errors
    /// Returns `HttpError::Tls` when the trust roots cannot be loaded and
    /// `HttpError::InvalidHeaderValue` for an unusable user agent.
    pub fn build(self) -> Result<HttpClient, HttpError> {
        let config = self.config;
        if config.transport == TransportSecurity::AllowInsecureHttp {
            tracing::warn!("plain http:// upstreams allowed, traffic to them is unencrypted");
        }

        let user_agent = HeaderValue::from_str(&config.user_agent)?;
        let timeout = config.request_timeout;

        let mut service: InnerService = ServiceBuilder::new()
            .layer(TimeoutLayer::new(timeout))
            .layer(UserAgentLayer::new(user_agent))
            .service(pooled_client(&config)?)
            .map_response(|response: Response<hyper::body::Incoming>| {
                response.map(|body| {
                    body.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
                        .boxed()
                })
            })
            .map_err(move |e: tower::BoxError| stack_error(e, timeout))
            .boxed_clone();
        if let Some(wrap) = self.auth {
            service = wrap(service);
        }

        Ok(HttpClient {
            service: Buffer::new(service, config.buffer_capacity.max(1)),
            max_body_size: config.max_body_size,
            transport: config.transport,
        })
    }
}

fn pooled_client(
    config: &HttpClientConfig,
) -> Result<Client<HttpsConnector<HttpConnector>, Full<Bytes>>, HttpError> {
    let schemes = tls::connector_builder(config.trust_roots)?;
    let connector = match config.transport {
        TransportSecurity::TlsOnly => schemes.https_only().enable_all_versions().build(),
        TransportSecurity::AllowInsecureHttp => {
            schemes.https_or_http().enable_all_versions().build()
        }
    };

    Ok(Client::builder(TokioExecutor::new())
        .pool_timer(TokioTimer::new())
        .pool_idle_timeout(config.pool_idle_timeout)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .build(connector))
}

/// Elapsed becomes `Timeout`; errors already typed below pass through.
fn stack_error(err: tower::BoxError, timeout: Duration) -> HttpError {
    if err.is::<tower::timeout::error::Elapsed>() {
        return HttpError::Timeout(timeout);
    }
    match err.downcast::<HttpError>() {
        Ok(err) => *err,
        Err(other) => HttpError::Transport(other),
    }
}
