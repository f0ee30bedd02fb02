//! Platform binding resolution.
//!
//! `VCAP_SERVICES` maps a service label to its bound instances. The asset
//! instance is looked up by the configured service name, the identity
//! service by the fixed `predix-uaa` label. Credentials of a present binding
//! decode into strict structs; a shape mismatch is a startup error naming
//! the offending field.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::credentials::{AssetCredentials, TokenCredentials};
use super::models::ServiceDescriptor;
use crate::config::{PlatformConfig, ProbeConfig};

/// Label of the identity service binding.
pub const UAA_LABEL: &str = "predix-uaa";

/// Everything `/info` and `/ping` need, resolved once at startup.
#[derive(Debug, Clone, Default)]
pub struct ProbeContext {
    pub descriptor: ServiceDescriptor,
    pub asset: AssetCredentials,
    /// The client `/ping` provisions and acts as.
    pub workflow: TokenCredentials,
    /// The zone administrator used to manage `workflow`.
    pub admin: TokenCredentials,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BindingError {
    #[error("{variable} is not valid JSON: {source}")]
    InvalidJson {
        variable: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("service binding '{label}' has invalid credentials: {reason}")]
    InvalidCredentials { label: String, reason: String },
}

#[derive(Debug, Deserialize)]
struct ServiceInstance {
    #[serde(default)]
    name: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    credentials: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
struct ApplicationEnv {
    application_name: Option<String>,
    name: Option<String>,
    application_uris: Option<Vec<String>>,
    uris: Option<Vec<String>>,
}

impl ApplicationEnv {
    fn app_name(&self) -> String {
        self.application_name
            .as_ref()
            .or(self.name.as_ref())
            .cloned()
            .unwrap_or_default()
    }

    fn first_uri(&self) -> String {
        self.application_uris
            .as_ref()
            .or(self.uris.as_ref())
            .and_then(|uris| uris.first())
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct AssetBinding {
    uri: String,
    zone: ZoneCredentials,
}

#[derive(Debug, Deserialize)]
struct ZoneCredentials {
    #[serde(rename = "oauth-scope")]
    oauth_scope: String,
    #[serde(rename = "http-header-name")]
    header_name: String,
    #[serde(rename = "http-header-value")]
    header_value: String,
}

#[derive(Debug, Deserialize)]
struct UaaBinding {
    uri: String,
    #[serde(rename = "issuerId")]
    issuer_id: String,
    subdomain: String,
}

/// Build the probe context from configuration and platform variables.
///
/// # Errors
///
/// Returns [`BindingError::InvalidJson`] when `VCAP_SERVICES` or
/// `VCAP_APPLICATION` is not valid JSON, and
/// [`BindingError::InvalidCredentials`] when a present asset or UAA binding
/// does not have the expected credential shape.
pub fn resolve(
    probe: &ProbeConfig,
    platform: &PlatformConfig,
) -> Result<ProbeContext, BindingError> {
    let application: ApplicationEnv =
        parse_variable("VCAP_APPLICATION", platform.vcap_application.as_deref())?
            .unwrap_or_default();
    let services: BTreeMap<String, Vec<ServiceInstance>> =
        parse_variable("VCAP_SERVICES", platform.vcap_services.as_deref())?.unwrap_or_default();

    let mut ctx = ProbeContext {
        descriptor: ServiceDescriptor {
            app_name: application.app_name(),
            app_uri: application.first_uri(),
            service_name: probe.service_name.clone(),
            plan_name: probe.service_plan.clone(),
            trusted_issuer: String::new(),
        },
        asset: AssetCredentials::default(),
        workflow: TokenCredentials {
            client_id: probe.client_id.clone(),
            client_secret: probe.client_secret.clone(),
            issuer_uri: None,
            base_scopes: Vec::new(),
        },
        admin: TokenCredentials {
            client_id: probe.admin_client_id.clone(),
            client_secret: probe.admin_client_secret.clone(),
            issuer_uri: None,
            base_scopes: Vec::new(),
        },
    };

    match find_instance(&services, &probe.service_name) {
        Some(instance) => {
            let binding: AssetBinding = decode_credentials(&probe.service_name, instance)?;
            tracing::info!(
                label = %probe.service_name,
                instance = %instance.name,
                uri = %binding.uri,
                header = %binding.zone.header_name,
                "resolved asset service binding"
            );
            ctx.workflow.base_scopes.push(binding.zone.oauth_scope.clone());
            ctx.asset = AssetCredentials {
                base_url: binding.uri,
                header_name: binding.zone.header_name,
                header_value: binding.zone.header_value,
                oauth_scope: binding.zone.oauth_scope,
            };
        }
        None => tracing::warn!(
            label = %probe.service_name,
            "no asset service binding found, /ping will report unbound"
        ),
    }

    match find_instance(&services, UAA_LABEL) {
        Some(instance) => {
            let binding: UaaBinding = decode_credentials(UAA_LABEL, instance)?;
            tracing::info!(
                instance = %instance.name,
                uri = %binding.uri,
                issuer = %binding.issuer_id,
                "resolved UAA service binding"
            );
            ctx.descriptor.trusted_issuer = binding.issuer_id;
            ctx.workflow.issuer_uri = Some(binding.uri.clone());
            ctx.admin.issuer_uri = Some(binding.uri);
            ctx.admin.base_scopes = vec![format!("zones.{}.admin", binding.subdomain)];
        }
        None => tracing::warn!(
            label = UAA_LABEL,
            "no UAA service binding found, token requests will fail"
        ),
    }

    Ok(ctx)
}

fn parse_variable<T: DeserializeOwned>(
    variable: &'static str,
    raw: Option<&str>,
) -> Result<Option<T>, BindingError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    serde_json::from_str(raw)
        .map(Some)
        .map_err(|source| BindingError::InvalidJson { variable, source })
}

/// First instance whose label matches; the map key stands in for a
/// missing `label` field.
fn find_instance<'a>(
    services: &'a BTreeMap<String, Vec<ServiceInstance>>,
    label: &str,
) -> Option<&'a ServiceInstance> {
    if label.is_empty() {
        return None;
    }
    services.iter().find_map(|(key, instances)| {
        instances
            .iter()
            .find(|instance| instance.label.as_deref().unwrap_or(key) == label)
    })
}

fn decode_credentials<T: DeserializeOwned>(
    label: &str,
    instance: &ServiceInstance,
) -> Result<T, BindingError> {
    T::deserialize(&instance.credentials).map_err(|e| BindingError::InvalidCredentials {
        label: label.to_owned(),
        reason: e.to_string(),
    })
}
