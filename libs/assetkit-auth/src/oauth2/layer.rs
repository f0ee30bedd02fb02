use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use assetkit_http::HttpError;
use http::Request;
use http::header::AUTHORIZATION;
use tower::{Layer, Service};

use super::token::Token;

/// Tower layer that sets `Authorization: Bearer` from a [`Token`] on every
/// request, renewing the token first when it has expired.
#[derive(Clone, Debug)]
pub struct BearerAuthLayer {
    token: Token,
}

impl BearerAuthLayer {
    #[must_use]
    pub fn new(token: &Token) -> Self {
        Self {
            token: token.clone(),
        }
    }
}

impl<S> Layer<S> for BearerAuthLayer {
    type Service = BearerAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BearerAuthService {
            inner,
            token: self.token.clone(),
        }
    }
}

/// Service produced by [`BearerAuthLayer`].
#[derive(Clone, Debug)]
pub struct BearerAuthService<S> {
    inner: S,
    token: Token,
}

impl<S, B> Service<Request<B>> for BearerAuthService<S>
where
    S: Service<Request<B>, Error = HttpError> + Clone + Send + 'static,
    S::Future: Send,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = HttpError;
    type Future = Pin<Box<dyn Future<Output = Result<S::Response, HttpError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        // The ready instance goes into the future; a fresh clone waits here.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let token = self.token.clone();
        Box::pin(async move {
            let authorization = token
                .authorization()
                .await
                .map_err(|e| HttpError::Transport(Box::new(e)))?;
            req.headers_mut().insert(AUTHORIZATION, authorization);
            inner.call(req).await
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::oauth2::config::OAuthClientConfig;
    use assetkit_utils::SecretString;
    use bytes::Bytes;
    use http::{Method, Response, StatusCode};
    use http_body_util::Full;
    use httpmock::prelude::*;
    use tower::ServiceExt;
    use url::Url;

    /// Answers 200 with the received `Authorization` header as the body.
    #[derive(Clone)]
    struct EchoAuthService;

    impl Service<Request<Full<Bytes>>> for EchoAuthService {
        type Response = Response<String>;
        type Error = HttpError;
        type Future = std::future::Ready<Result<Self::Response, Self::Error>>;

        fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: Request<Full<Bytes>>) -> Self::Future {
            let header = req
                .headers()
                .get(AUTHORIZATION)
                .expect("authorization header missing");
            assert!(header.is_sensitive());
            std::future::ready(Ok(Response::builder()
                .status(StatusCode::OK)
                .body(header.to_str().unwrap().to_owned())
                .unwrap()))
        }
    }

    fn request() -> http::request::Builder {
        Request::builder()
            .method(Method::GET)
            .uri("http://asset.example.com/assets")
    }

    #[test]
    fn bearer_auth_is_send_sync_clone() {
        fn assert_traits<T: Send + Sync + Clone>() {}
        assert_traits::<BearerAuthLayer>();
        assert_traits::<BearerAuthService<EchoAuthService>>();
    }

    #[tokio::test]
    async fn injects_fetched_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(200)
                .body(r#"{"access_token":"tok-layer","expires_in":3600,"token_type":"bearer"}"#);
        });

        let token = Token::fetch(&OAuthClientConfig {
            token_endpoint: Some(Url::parse(&server.url("/oauth/token")).unwrap()),
            client_id: "hello-asset".into(),
            client_secret: SecretString::new("s3cr3t"),
            http_config: Some(assetkit_http::HttpClientConfig::for_testing()),
            ..Default::default()
        })
        .await
        .unwrap();

        let service = BearerAuthLayer::new(&token).layer(EchoAuthService);
        for _ in 0..2 {
            let req = request().body(Full::new(Bytes::new())).unwrap();
            let resp = service.clone().oneshot(req).await.unwrap();
            assert_eq!(resp.into_body(), "Bearer tok-layer");
        }
        mock.assert_hits(1);
    }

    #[tokio::test]
    async fn replaces_caller_authorization() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(200).body(r#"{"access_token":"tok-layer"}"#);
        });
        let token = Token::fetch(&OAuthClientConfig {
            token_endpoint: Some(Url::parse(&server.url("/oauth/token")).unwrap()),
            client_id: "hello-asset".into(),
            client_secret: SecretString::new("s3cr3t"),
            http_config: Some(assetkit_http::HttpClientConfig::for_testing()),
            ..Default::default()
        })
        .await
        .unwrap();

        let req = request()
            .header(AUTHORIZATION, "Basic Zm9vOmJhcg==")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = BearerAuthLayer::new(&token)
            .layer(EchoAuthService)
            .oneshot(req)
            .await
            .unwrap();

        assert_eq!(resp.into_body(), "Bearer tok-layer");
    }

    #[tokio::test]
    async fn expired_token_is_renewed_before_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(200)
                .body(r#"{"access_token":"tok-brief","expires_in":1,"token_type":"bearer"}"#);
        });
        let token = Token::fetch(&OAuthClientConfig {
            token_endpoint: Some(Url::parse(&server.url("/oauth/token")).unwrap()),
            client_id: "hello-asset".into(),
            client_secret: SecretString::new("s3cr3t"),
            http_config: Some(assetkit_http::HttpClientConfig::for_testing()),
            ..Default::default()
        })
        .await
        .unwrap();
        let service = BearerAuthLayer::new(&token).layer(EchoAuthService);

        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        let req = request().body(Full::new(Bytes::new())).unwrap();
        let resp = service.oneshot(req).await.unwrap();

        assert_eq!(resp.into_body(), "Bearer tok-brief");
        mock.assert_hits(2);
    }

    #[tokio::test]
    async fn failed_renewal_fails_request() {
        let server = MockServer::start();
        let mut ok = server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(200)
                .body(r#"{"access_token":"tok-brief","expires_in":1,"token_type":"bearer"}"#);
        });
        let token = Token::fetch(&OAuthClientConfig {
            token_endpoint: Some(Url::parse(&server.url("/oauth/token")).unwrap()),
            client_id: "hello-asset".into(),
            client_secret: SecretString::new("s3cr3t"),
            http_config: Some(assetkit_http::HttpClientConfig::for_testing()),
            ..Default::default()
        })
        .await
        .unwrap();
        ok.delete();
        server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(503);
        });

        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        let req = request().body(Full::new(Bytes::new())).unwrap();
        let err = BearerAuthLayer::new(&token)
            .layer(EchoAuthService)
            .oneshot(req)
            .await
            .unwrap_err();

        assert!(matches!(err, HttpError::Transport(_)), "got {err:?}");
        assert!(err.to_string().contains("503"), "got {err}");
    }
}
