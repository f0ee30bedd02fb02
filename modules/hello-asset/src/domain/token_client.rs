use assetkit_auth::http_error::format_http_error;
use assetkit_auth::{HttpClientBuilderExt, OAuthClientConfig, Token};
use assetkit_http::{HttpClient, HttpClientBuilder};

use super::credentials::TokenCredentials;
use super::error::TokenClientError;
use crate::config::ProbeHttpConfig;

/// Exchanges client credentials for an HTTP client that carries the
/// resulting bearer token.
#[derive(Debug, Clone, Default)]
pub struct TokenClient {
    http: ProbeHttpConfig,
}

impl TokenClient {
    #[must_use]
    pub fn new(http: ProbeHttpConfig) -> Self {
        Self { http }
    }

    /// Client-credentials grant at `<issuer>/oauth/token` for
    /// `creds.base_scopes` plus `extra_scopes`.
    ///
    /// The first grant happens here. The client renews the token on its
    /// next request after expiry and stops all token traffic once dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TokenClientError::NotBound`] without an issuer,
    /// [`TokenClientError::InvalidIssuer`] for an unusable issuer URI, and
    /// [`TokenClientError::Token`] when the token request fails.
    pub async fn exchange_credentials_for_client(
        &self,
        creds: &TokenCredentials,
        extra_scopes: &[&str],
    ) -> Result<HttpClient, TokenClientError> {
        let token_endpoint = match creds.issuer_endpoint(&["oauth", "token"]) {
            Some(Ok(url)) => url,
            Some(Err(reason)) => return Err(TokenClientError::InvalidIssuer(reason)),
            None => {
                return Err(TokenClientError::NotBound {
                    client_id: creds.client_id.clone(),
                });
            }
        };

        let scopes = creds.effective_scopes(extra_scopes);
        tracing::debug!(
            client_id = %creds.client_id,
            endpoint = %token_endpoint,
            scopes = %scopes.join(" "),
            "exchanging client credentials"
        );

        let token = Token::fetch(&OAuthClientConfig {
            token_endpoint: Some(token_endpoint),
            client_id: creds.client_id.clone(),
            client_secret: creds.client_secret.clone(),
            scopes,
            http_config: Some(self.http.to_token_client_config()),
        })
        .await?;

        HttpClientBuilder::with_config(self.http.to_client_config())
            .with_bearer_auth(&token)
            .build()
            .map_err(|e| TokenClientError::Client(format_http_error(&e, "HTTP client")))
    }
}
