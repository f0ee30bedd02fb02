#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Outbound authentication for calls made by the hello-asset service.
//!
//! [`oauth2`] implements the client credentials grant: [`Token::fetch`]
//! obtains a bearer token and
//! [`HttpClientBuilderExt::with_bearer_auth`] sends it from an
//! [`assetkit_http::HttpClient`]. An expired token is renewed by the next
//! request that needs it. Nothing runs once the caller lets go of the token
//! and the client.

pub mod http_error;
pub mod oauth2;

pub use oauth2::{BearerAuthLayer, HttpClientBuilderExt, OAuthClientConfig, Token, TokenError};
