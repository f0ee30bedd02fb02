use std::fmt;

use serde::{Deserialize, Serialize};

use super::credentials::{COMMON_SCOPES, TokenCredentials, merge_scopes};

/// What `/info` reports about this instance and its bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceDescriptor {
    pub app_name: String,
    pub app_uri: String,
    pub service_name: String,
    pub plan_name: String,
    pub trusted_issuer: String,
}

/// An asset record as stored by the asset service.
///
/// Listings may carry records written by other clients, so every field
/// falls back to empty when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "serialNo")]
    pub serial_no: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub uri: String,
}

impl AssetRecord {
    /// The record `/ping` writes and then looks for.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            id: "simpleId".to_owned(),
            serial_no: "simple_serial".to_owned(),
            description: "Simple Asset".to_owned(),
            uri: "/assets/simple".to_owned(),
        }
    }
}

/// Grant types given to the workflow client.
pub const WORKFLOW_GRANT_TYPES: &[&str] = &[
    "refresh_token",
    "client_credentials",
    "password",
    "authorization_code",
];

/// Body of `POST /oauth/clients`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct UaaClientRegistration {
    pub name: String,
    pub client_id: String,
    pub client_secret: String,
    pub authorized_grant_types: Vec<String>,
    pub scope: Vec<String>,
    pub authorities: Vec<String>,
    pub autoapprove: Vec<String>,
}

impl fmt::Debug for UaaClientRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UaaClientRegistration")
            .field("name", &self.name)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("authorized_grant_types", &self.authorized_grant_types)
            .field("scope", &self.scope)
            .field("authorities", &self.authorities)
            .field("autoapprove", &self.autoapprove)
            .finish()
    }
}

impl UaaClientRegistration {
    /// Registration for the workflow client: common scopes followed by the
    /// client's own base scopes, granted as scopes, authorities and
    /// auto-approvals alike.
    #[must_use]
    pub fn for_workflow(creds: &TokenCredentials) -> Self {
        let scopes = merge_scopes(
            COMMON_SCOPES.iter().copied(),
            creds.base_scopes.iter().map(String::as_str),
        );

        Self {
            name: creds.client_id.clone(),
            client_id: creds.client_id.clone(),
            client_secret: creds.client_secret.expose().to_owned(),
            authorized_grant_types: WORKFLOW_GRANT_TYPES.iter().map(|&g| g.to_owned()).collect(),
            scope: scopes.clone(),
            authorities: scopes.clone(),
            autoapprove: scopes,
        }
    }
}
