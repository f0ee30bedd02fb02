use tower::{Layer, ServiceExt};

use super::layer::BearerAuthLayer;
use super::token::Token;

/// Bearer auth for [`assetkit_http::HttpClientBuilder`].
///
/// ```ignore
/// let token = Token::fetch(&config).await?;
/// let client = HttpClientBuilder::with_config(http).with_bearer_auth(&token).build()?;
/// ```
pub trait HttpClientBuilderExt {
    /// Send `token` as `Authorization: Bearer` on every request.
    #[must_use]
    fn with_bearer_auth(self, token: &Token) -> Self;
}

impl HttpClientBuilderExt for assetkit_http::HttpClientBuilder {
    fn with_bearer_auth(self, token: &Token) -> Self {
        let layer = BearerAuthLayer::new(token);
        self.with_auth_layer(move |inner| layer.layer(inner).boxed_clone())
    }
}
