use assetkit_auth::http_error::format_http_error;
use assetkit_http::{HttpClient, HttpError};
use http::StatusCode;

use super::credentials::{ADMIN_SCOPES, TokenCredentials};
use super::error::UaaClientError;
use super::models::UaaClientRegistration;
use super::token_client::TokenClient;

const CONTEXT: &str = "UAA";

/// How a client deletion ended, all of them tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    /// UAA answered 500; observed when deleting a client it is still
    /// cleaning up.
    ServerError,
}

/// Registers and removes OAuth clients through the zone administrator.
///
/// An admin token is obtained for every call.
#[derive(Debug, Clone)]
pub struct UaaClientManager {
    admin: TokenCredentials,
    tokens: TokenClient,
}

impl UaaClientManager {
    #[must_use]
    pub fn new(admin: TokenCredentials, tokens: TokenClient) -> Self {
        Self { admin, tokens }
    }

    /// `POST <uaa>/oauth/clients` with the workflow registration.
    ///
    /// # Errors
    ///
    /// Fails when no admin client can be obtained, on transport errors, and
    /// for any status other than 201.
    pub async fn create_client(&self, workflow: &TokenCredentials) -> Result<(), UaaClientError> {
        let admin = self.admin_client().await?;
        let url = self.endpoint(&["oauth", "clients"])?;
        let registration = UaaClientRegistration::for_workflow(workflow);

        tracing::info!(
            client_id = %registration.client_id,
            scopes = %registration.scope.join(" "),
            "registering UAA client"
        );

        let response = admin
            .post(&url)
            .header("accept", "application/json")
            .json(&registration)
            .map_err(|e| UaaClientError::Request(format_http_error(&e, CONTEXT)))?
            .send()
            .await
            .map_err(|e| transport("POST", &e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| UaaClientError::BodyRead(format_http_error(&e, CONTEXT)))?;
        tracing::debug!(
            status = status.as_u16(),
            body = %String::from_utf8_lossy(&body),
            "UAA create client response"
        );

        if status == StatusCode::CREATED {
            Ok(())
        } else {
            Err(UaaClientError::UnexpectedCreateStatus(status))
        }
    }

    /// `DELETE <uaa>/oauth/clients/<client_id>`.
    ///
    /// # Errors
    ///
    /// Fails when no admin client can be obtained, on transport errors, and
    /// for any status other than 200, 404 and 500.
    pub async fn delete_client(
        &self,
        workflow: &TokenCredentials,
    ) -> Result<DeleteOutcome, UaaClientError> {
        let admin = self.admin_client().await?;
        let url = self.endpoint(&["oauth", "clients", &workflow.client_id])?;

        let response = admin
            .delete(&url)
            .send()
            .await
            .map_err(|e| transport("DELETE", &e))?;

        match response.status() {
            StatusCode::OK => {
                tracing::info!(client_id = %workflow.client_id, "deleted UAA client");
                Ok(DeleteOutcome::Deleted)
            }
            StatusCode::NOT_FOUND => {
                tracing::info!(client_id = %workflow.client_id, "UAA client did not exist");
                Ok(DeleteOutcome::NotFound)
            }
            StatusCode::INTERNAL_SERVER_ERROR => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| UaaClientError::BodyRead(format_http_error(&e, CONTEXT)))?;
                tracing::warn!(
                    client_id = %workflow.client_id,
                    body = %String::from_utf8_lossy(&body),
                    "UAA returned 500 on client delete, continuing"
                );
                Ok(DeleteOutcome::ServerError)
            }
            other => Err(UaaClientError::UnexpectedDeleteStatus(other)),
        }
    }

    async fn admin_client(&self) -> Result<HttpClient, UaaClientError> {
        self.tokens
            .exchange_credentials_for_client(&self.admin, ADMIN_SCOPES)
            .await
            .map_err(UaaClientError::AdminClient)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<String, UaaClientError> {
        match self.admin.issuer_endpoint(segments) {
            Some(Ok(url)) => Ok(url.into()),
            Some(Err(reason)) => Err(UaaClientError::Request(reason)),
            None => Err(UaaClientError::Request("no UAA service is bound".into())),
        }
    }
}

fn transport(method: &'static str, err: &HttpError) -> UaaClientError {
    UaaClientError::Transport {
        method,
        reason: format_http_error(err, CONTEXT),
    }
}
