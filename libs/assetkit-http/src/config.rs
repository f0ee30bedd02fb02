use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_USER_AGENT: &str = concat!("assetkit-http/", env!("CARGO_PKG_VERSION"));

/// Where server certificates are anchored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustRoots {
    /// Bundled Mozilla roots.
    #[default]
    Webpki,
    /// The container's certificate store, which carries platform-injected
    /// CAs on Cloud Foundry.
    Native,
}

/// Which URL schemes a client may reach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportSecurity {
    #[default]
    TlsOnly,
    /// `http://` is accepted as well. For mock servers and routes where TLS
    /// ends in front of the container.
    AllowInsecureHttp,
}

/// Settings for one [`HttpClient`](crate::HttpClient).
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Applied to each request, connect included.
    pub request_timeout: Duration,
    /// Upper bound for any response body read.
    pub max_body_size: usize,
    pub user_agent: String,
    pub transport: TransportSecurity,
    pub trust_roots: TrustRoots,
    /// Requests queued beyond this are refused with `HttpError::Overloaded`.
    pub buffer_capacity: usize,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_body_size: 10 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            transport: TransportSecurity::TlsOnly,
            trust_roots: TrustRoots::Webpki,
            buffer_capacity: 1024,
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 32,
        }
    }
}

impl HttpClientConfig {
    /// Preset for UAA `/oauth/token`: one small JSON answer per grant.
    #[must_use]
    pub fn token_endpoint() -> Self {
        Self {
            max_body_size: 1024 * 1024,
            buffer_capacity: 256,
            pool_idle_timeout: Duration::from_secs(60),
            pool_max_idle_per_host: 4,
            ..Self::default()
        }
    }

    /// Preset for local mock servers; plain HTTP allowed.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            transport: TransportSecurity::AllowInsecureHttp,
            ..Self::token_endpoint()
        }
    }
}
