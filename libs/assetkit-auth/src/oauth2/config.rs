use std::fmt;
use url::Url;

use super::error::TokenError;
use assetkit_utils::SecretString;

/// Client credentials grant parameters.
///
/// Credentials go out as HTTP Basic authentication, the form the UAA token
/// endpoint accepts.
#[derive(Clone, Default)]
pub struct OAuthClientConfig {
    /// Token endpoint, e.g. `https://<zone>.uaa.example.com/oauth/token`.
    pub token_endpoint: Option<Url>,

    pub client_id: String,

    /// Redacted in `Debug` output.
    pub client_secret: SecretString,

    /// Requested scopes, sent space-separated in the `scope` form field.
    pub scopes: Vec<String>,

    /// HTTP client configuration for token requests.
    /// `None` means [`HttpClientConfig::token_endpoint`](assetkit_http::HttpClientConfig::token_endpoint).
    pub http_config: Option<assetkit_http::HttpClientConfig>,
}

impl OAuthClientConfig {
    /// # Errors
    ///
    /// Returns [`TokenError::ConfigError`] when the client id or secret is
    /// empty or no token endpoint is set.
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.client_id.trim().is_empty() {
            return Err(TokenError::ConfigError(
                "client_id must not be empty".into(),
            ));
        }
        if self.client_secret.is_empty() {
            return Err(TokenError::ConfigError(
                "client_secret must not be empty".into(),
            ));
        }
        if self.token_endpoint.is_none() {
            return Err(TokenError::ConfigError(
                "token_endpoint must be set".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for OAuthClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthClientConfig")
            .field("token_endpoint", &self.token_endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret)
            .field("scopes", &self.scopes)
            .field("http_config", &self.http_config)
            .finish()
    }
}
