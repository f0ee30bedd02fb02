use super::asset_gateway::AssetGateway;
use super::bindings::ProbeContext;
use super::credentials::COMMON_SCOPES;
use super::error::ProbeError;
use super::models::{AssetRecord, ServiceDescriptor};
use super::outcome::ProbeOutcome;
use super::token_client::TokenClient;
use super::uaa_clients::UaaClientManager;
use crate::config::ProbeHttpConfig;

/// Runs the `/ping` workflow against the resolved bindings.
///
/// Holds no mutable state; concurrent runs only share read-only context.
#[derive(Debug, Clone)]
pub struct ProbeService {
    context: ProbeContext,
    tokens: TokenClient,
    uaa: UaaClientManager,
    assets: AssetGateway,
    sample: AssetRecord,
}

impl ProbeService {
    #[must_use]
    pub fn new(context: ProbeContext, http: ProbeHttpConfig) -> Self {
        let tokens = TokenClient::new(http);
        Self {
            uaa: UaaClientManager::new(context.admin.clone(), tokens.clone()),
            assets: AssetGateway::new(context.asset.clone()),
            tokens,
            context,
            sample: AssetRecord::sample(),
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.context.descriptor
    }

    /// Re-provision the workflow client, then write and read back the
    /// sample record. Never fails; errors become [`ProbeOutcome::Failed`].
    pub async fn run(&self) -> ProbeOutcome {
        if !self.context.asset.is_bound() {
            tracing::info!("asset service not bound, skipping workflow");
            return ProbeOutcome::NotBound;
        }

        match self.execute().await {
            Ok(outcome) => {
                tracing::info!(matched = outcome.is_match(), "workflow finished");
                outcome
            }
            Err(err) => {
                tracing::warn!(error = %err, "workflow failed");
                ProbeOutcome::Failed(err)
            }
        }
    }

    async fn execute(&self) -> Result<ProbeOutcome, ProbeError> {
        let workflow = &self.context.workflow;

        tracing::info!(client_id = %workflow.client_id, "deleting stale UAA client");
        let deleted = self
            .uaa
            .delete_client(workflow)
            .await
            .map_err(ProbeError::Cleanup)?;
        tracing::debug!(?deleted, "stale client cleanup done");

        tracing::info!(client_id = %workflow.client_id, "creating UAA client");
        self.uaa
            .create_client(workflow)
            .await
            .map_err(ProbeError::Registration)?;

        let client = self
            .tokens
            .exchange_credentials_for_client(workflow, COMMON_SCOPES)
            .await
            .map_err(ProbeError::Client)?;

        self.assets
            .create_record(&client, &self.sample)
            .await
            .map_err(ProbeError::Post)?;
        tracing::info!(id = %self.sample.id, "posted sample asset");

        let records = self
            .assets
            .list_records(&client)
            .await
            .map_err(ProbeError::Query)?;
        tracing::info!(count = records.len(), "queried assets");

        Ok(ProbeOutcome::from_listing(&self.sample.id, &records))
    }
}
