use assetkit_auth::http_error::format_http_error;
use assetkit_http::{HttpClient, HttpError, HttpResponse, RequestBuilder};
use bytes::Bytes;

use super::credentials::AssetCredentials;
use super::error::AssetGatewayError;
use super::models::AssetRecord;

const CONTEXT: &str = "Asset";

/// `POST`/`GET` on `<asset>/assets`, scoped to the bound zone.
#[derive(Debug, Clone)]
pub struct AssetGateway {
    creds: AssetCredentials,
}

impl AssetGateway {
    #[must_use]
    pub fn new(creds: AssetCredentials) -> Self {
        Self { creds }
    }

    /// Store `record` as a one-element array.
    ///
    /// # Errors
    ///
    /// Returns [`AssetGatewayError::UpstreamRejected`] for a non-2xx answer,
    /// besides request construction, transport and body read failures.
    pub async fn create_record(
        &self,
        client: &HttpClient,
        record: &AssetRecord,
    ) -> Result<(), AssetGatewayError> {
        let response = self
            .scoped(client.post(&self.creds.records_url()))
            .json(&[record])
            .map_err(|e| AssetGatewayError::Request(format_http_error(&e, CONTEXT)))?
            .send()
            .await
            .map_err(|e| send_failed(&e))?;

        tracing::info!(status = response.status().as_u16(), id = %record.id, "asset POST");
        read_body(response).await?;
        Ok(())
    }

    /// All records visible in the zone, in response order.
    ///
    /// # Errors
    ///
    /// Request construction, transport, upstream rejection, body read and
    /// decode failures each map to their own [`AssetGatewayError`] variant.
    pub async fn list_records(
        &self,
        client: &HttpClient,
    ) -> Result<Vec<AssetRecord>, AssetGatewayError> {
        let response = self
            .scoped(client.get(&self.creds.records_url()))
            .send()
            .await
            .map_err(|e| send_failed(&e))?;

        tracing::info!(status = response.status().as_u16(), "asset GET");
        let body = read_body(response).await?;
        tracing::debug!(body = %String::from_utf8_lossy(&body), "asset GET body");

        serde_json::from_slice(&body).map_err(AssetGatewayError::Decode)
    }

    fn scoped(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(&self.creds.header_name, &self.creds.header_value)
            .header("content-type", "application/json")
    }
}

fn send_failed(err: &HttpError) -> AssetGatewayError {
    let message = format_http_error(err, CONTEXT);
    if err.is_request_error() {
        AssetGatewayError::Request(message)
    } else {
        AssetGatewayError::Transport(message)
    }
}

async fn read_body(response: HttpResponse) -> Result<Bytes, AssetGatewayError> {
    response.checked_bytes().await.map_err(|e| match e {
        HttpError::HttpStatus {
            status,
            body_preview,
            ..
        } => AssetGatewayError::UpstreamRejected {
            status,
            body: body_preview,
        },
        other => AssetGatewayError::BodyRead(format_http_error(&other, CONTEXT)),
    })
}
