use std::time::Duration;

use assetkit_http::{HttpClientConfig, TransportSecurity, TrustRoots};
use assetkit_utils::SecretString;
use serde::{Deserialize, Serialize};

/// Probe settings: which asset binding to use and the OAuth clients involved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ProbeConfig {
    /// Label of the asset service binding in `VCAP_SERVICES`
    pub service_name: String,
    pub service_plan: String,
    /// Workflow client, re-created on every `/ping`
    pub client_id: String,
    pub client_secret: SecretString,
    pub admin_client_id: String,
    pub admin_client_secret: SecretString,
    pub http: ProbeHttpConfig,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            service_name: String::new(),
            service_plan: String::new(),
            client_id: String::new(),
            client_secret: SecretString::default(),
            admin_client_id: default_admin_client_id(),
            admin_client_secret: SecretString::default(),
            http: ProbeHttpConfig::default(),
        }
    }
}

fn default_admin_client_id() -> String {
    "admin".to_owned()
}

/// Outbound HTTP settings shared by every upstream call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ProbeHttpConfig {
    #[serde(with = "assetkit_utils::humantime_serde")]
    pub request_timeout: Duration,
    /// Permit plain `http://` upstreams (local development, mocks).
    pub allow_insecure_http: bool,
    /// `webpki` or `native`; the latter picks up CAs the platform installs
    /// into the container.
    pub trust_roots: TrustRoots,
    pub user_agent: String,
}

impl Default for ProbeHttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            allow_insecure_http: false,
            trust_roots: TrustRoots::default(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    concat!("hello-asset/", env!("CARGO_PKG_VERSION")).to_owned()
}

impl ProbeHttpConfig {
    /// Client config for asset and UAA management calls.
    #[must_use]
    pub fn to_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            request_timeout: self.request_timeout,
            user_agent: self.user_agent.clone(),
            transport: self.transport(),
            trust_roots: self.trust_roots,
            ..HttpClientConfig::default()
        }
    }

    /// Client config for token endpoint calls.
    #[must_use]
    pub fn to_token_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            request_timeout: self.request_timeout,
            user_agent: self.user_agent.clone(),
            transport: self.transport(),
            trust_roots: self.trust_roots,
            ..HttpClientConfig::token_endpoint()
        }
    }

    fn transport(&self) -> TransportSecurity {
        if self.allow_insecure_http {
            TransportSecurity::AllowInsecureHttp
        } else {
            TransportSecurity::TlsOnly
        }
    }
}

/// Raw platform-injected JSON documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PlatformConfig {
    /// `VCAP_SERVICES`
    pub vcap_services: Option<String>,
    /// `VCAP_APPLICATION`
    pub vcap_application: Option<String>,
}
