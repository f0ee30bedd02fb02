use serde::Deserialize;

/// Token endpoint response, limited to what the client credentials grant
/// needs. Unknown fields (`scope`, `jti`, ...) are ignored.
///
/// Deserialize-only so an access token can never be serialized by accident.
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}
