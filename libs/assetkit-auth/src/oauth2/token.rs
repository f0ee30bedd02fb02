use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use http::HeaderValue;
use tokio::sync::Mutex;
use zeroize::Zeroizing;

use super::config::OAuthClientConfig;
use super::error::TokenError;
use super::source::{IssuedToken, OAuthTokenSource};

/// Bearer token from a client credentials grant.
///
/// The token is renewed lazily: a request made after it expired waits for
/// a new grant first. No task runs between requests, so dropping every
/// clone of a `Token` ends all traffic to the token endpoint.
#[derive(Clone)]
pub struct Token {
    inner: Arc<Inner>,
}

struct Inner {
    source: OAuthTokenSource,
    current: Mutex<Bearer>,
}

struct Bearer {
    authorization: HeaderValue,
    /// `None` when the grant carried no lifetime.
    expires_at: Option<Instant>,
}

impl Bearer {
    fn from_issued(issued: &IssuedToken) -> Result<Self, TokenError> {
        let raw = Zeroizing::new(format!("Bearer {}", issued.access_token.expose()));
        let mut authorization = HeaderValue::from_str(&raw).map_err(|_| {
            TokenError::InvalidResponse("access token is not a valid header value".into())
        })?;
        authorization.set_sensitive(true);
        Ok(Self {
            authorization,
            expires_at: issued.expires_in.map(|ttl| Instant::now() + ttl),
        })
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token").finish_non_exhaustive()
    }
}

impl Token {
    /// Perform the first grant.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::ConfigError`] for an invalid config and the
    /// grant's error when the endpoint refuses or answers badly.
    pub async fn fetch(config: &OAuthClientConfig) -> Result<Self, TokenError> {
        config.validate()?;

        let source = OAuthTokenSource::new(config)?;
        let first = Bearer::from_issued(&source.request_token().await?)?;
        Ok(Self {
            inner: Arc::new(Inner {
                source,
                current: Mutex::new(first),
            }),
        })
    }

    /// `Authorization` value for the next request, marked sensitive.
    ///
    /// # Errors
    ///
    /// Returns the grant's error when an expired token cannot be renewed.
    pub async fn authorization(&self) -> Result<HeaderValue, TokenError> {
        let mut current = self.inner.current.lock().await;
        if current.is_expired() {
            tracing::debug!("access token expired, requesting a new one");
            *current = Bearer::from_issued(&self.inner.source.request_token().await?)?;
        }
        Ok(current.authorization.clone())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use assetkit_utils::SecretString;
    use httpmock::prelude::*;
    use std::time::Duration;
    use url::Url;

    fn test_config(server: &MockServer) -> OAuthClientConfig {
        OAuthClientConfig {
            token_endpoint: Some(Url::parse(&server.url("/oauth/token")).unwrap()),
            client_id: "hello-asset".into(),
            client_secret: SecretString::new("s3cr3t"),
            http_config: Some(assetkit_http::HttpClientConfig::for_testing()),
            ..Default::default()
        }
    }

    fn token_json(token: &str, expires_in: u64) -> String {
        format!(r#"{{"access_token":"{token}","expires_in":{expires_in},"token_type":"bearer"}}"#)
    }

    fn issued(access_token: &str, expires_in: Option<Duration>) -> IssuedToken {
        IssuedToken {
            access_token: SecretString::new(access_token),
            expires_in,
        }
    }

    #[test]
    fn token_is_send_sync_clone() {
        fn assert_traits<T: Send + Sync + Clone>() {}
        assert_traits::<Token>();
    }

    #[tokio::test]
    async fn fresh_token_is_reused() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(200).body(token_json("tok-get", 3600));
        });

        let token = Token::fetch(&test_config(&server)).await.unwrap();

        for _ in 0..3 {
            let value = token.authorization().await.unwrap();
            assert_eq!(value.to_str().unwrap(), "Bearer tok-get");
            assert!(value.is_sensitive());
        }
        mock.assert_hits(1);
    }

    #[tokio::test]
    async fn idle_token_causes_no_traffic() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(200).body(token_json("tok-short", 1));
        });

        let _token = Token::fetch(&test_config(&server)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;

        mock.assert_hits(1);
    }

    #[tokio::test]
    async fn expired_token_is_renewed_on_use() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(200).body(token_json("tok-short", 1));
        });

        let token = Token::fetch(&test_config(&server)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        mock.assert_hits(1);

        token.authorization().await.unwrap();
        mock.assert_hits(2);
    }

    #[tokio::test]
    async fn failed_renewal_is_reported() {
        let server = MockServer::start();
        let mut ok = server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(200).body(token_json("tok-short", 1));
        });
        let token = Token::fetch(&test_config(&server)).await.unwrap();
        ok.delete();
        server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(401);
        });

        tokio::time::sleep(Duration::from_millis(1500)).await;
        let err = token.authorization().await.unwrap_err();

        assert_eq!(err.to_string(), "OAuth2 token HTTP 401 Unauthorized");
    }

    #[tokio::test]
    async fn fetch_validates_config() {
        let cfg = OAuthClientConfig {
            client_id: "hello-asset".into(),
            client_secret: SecretString::new("s3cr3t"),
            ..Default::default()
        };
        let err = Token::fetch(&cfg).await.unwrap_err();
        assert!(matches!(err, TokenError::ConfigError(_)), "got: {err}");
    }

    #[tokio::test]
    async fn fetch_reports_failed_grant() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(500);
        });

        let err = Token::fetch(&test_config(&server)).await.unwrap_err();
        assert!(
            err.to_string().contains("HTTP 500"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn token_without_lifetime_never_expires() {
        let bearer = Bearer::from_issued(&issued("tok", None)).unwrap();
        assert!(!bearer.is_expired());

        let bearer = Bearer::from_issued(&issued("tok", Some(Duration::ZERO))).unwrap();
        assert!(bearer.is_expired());
    }

    #[test]
    fn control_characters_in_token_are_rejected() {
        let err = Bearer::from_issued(&issued("tok\nInjected: 1", None)).err().unwrap();
        assert!(matches!(err, TokenError::InvalidResponse(_)), "got: {err}");
    }

    #[tokio::test]
    async fn debug_does_not_reveal_token() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(200).body(token_json("tok-secret-value", 3600));
        });

        let token = Token::fetch(&test_config(&server)).await.unwrap();
        let dbg = format!("{token:?}");
        assert!(!dbg.contains("tok-secret-value"));
    }
}
