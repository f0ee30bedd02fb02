use std::sync::Arc;

use axum::{Extension, Json};

use crate::domain::models::ServiceDescriptor;
use crate::domain::service::ProbeService;

/// Discovered bindings as JSON
pub async fn get_info(Extension(svc): Extension<Arc<ProbeService>>) -> Json<ServiceDescriptor> {
    Json(svc.descriptor().clone())
}

/// Run the round-trip workflow.
///
/// Always answers 200; failures are part of the text report.
pub async fn get_ping(Extension(svc): Extension<Arc<ProbeService>>) -> String {
    svc.run().await.to_string()
}
