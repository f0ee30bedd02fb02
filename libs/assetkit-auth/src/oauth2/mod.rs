//! `OAuth2` client credentials grant.
//!
//! [`Token::fetch`] performs the first grant; [`HttpClientBuilderExt`]
//! attaches the token to an `assetkit-http` client. Renewal happens on the
//! first request after expiry, never in the background.

pub mod builder_ext;
pub mod config;
pub mod error;
pub mod layer;
pub(crate) mod source;
pub mod token;
pub(crate) mod types;

pub use builder_ext::HttpClientBuilderExt;
pub use config::OAuthClientConfig;
pub use error::TokenError;
pub use layer::BearerAuthLayer;
pub use token::Token;
