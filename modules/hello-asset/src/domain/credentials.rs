use assetkit_utils::SecretString;
use url::Url;

/// Scopes requested on top of `zones.<subdomain>.admin` for the admin client.
pub const ADMIN_SCOPES: &[&str] = &[
    "clients.read",
    "zones.read",
    "clients.secret",
    "idps.write",
    "uaa.resource",
    "clients.write",
    "clients.admin",
    "uaa.admin",
    "idps.read",
    "scim.write",
    "scim.read",
];

/// Scopes every workflow client is registered with and requests.
pub const COMMON_SCOPES: &[&str] = &["scim.me", "uaa.resource", "openid"];

/// Connection details for the asset service, from the asset binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetCredentials {
    /// Asset service base URL; empty when no asset service is bound.
    pub base_url: String,
    /// Zone header, e.g. `Predix-Zone-Id`
    pub header_name: String,
    pub header_value: String,
    /// Zone user scope, e.g. `predix-asset.zones.<zone>.user`
    pub oauth_scope: String,
}

impl AssetCredentials {
    #[must_use]
    pub fn is_bound(&self) -> bool {
        !self.base_url.trim().is_empty()
    }

    /// `<base>/assets`, tolerating a trailing `/` on the base URL.
    #[must_use]
    pub fn records_url(&self) -> String {
        format!("{}/assets", self.base_url.trim_end_matches('/'))
    }
}

/// An OAuth client identity at the UAA.
///
/// Effective scopes are computed per request from `base_scopes` and the
/// caller's fixed extras; the stored value never changes.
#[derive(Debug, Clone, Default)]
pub struct TokenCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
    /// UAA base URI; `None` when no UAA service is bound.
    pub issuer_uri: Option<String>,
    pub base_scopes: Vec<String>,
}

impl TokenCredentials {
    /// `base_scopes` followed by `extra`, first occurrence wins.
    #[must_use]
    pub fn effective_scopes(&self, extra: &[&str]) -> Vec<String> {
        merge_scopes(self.base_scopes.iter().map(String::as_str), extra.iter().copied())
    }

    /// Issuer URL with `segments` appended, e.g. `["oauth", "token"]`.
    ///
    /// Returns `None` without an issuer, and `Err` with the parse message
    /// when the issuer is not an absolute URL.
    #[must_use]
    pub fn issuer_endpoint(&self, segments: &[&str]) -> Option<Result<Url, String>> {
        let issuer = self.issuer_uri.as_deref()?;
        Some(join_segments(issuer, segments))
    }
}

/// Concatenate two scope lists, dropping empties and repeats.
#[must_use]
pub fn merge_scopes<'a>(
    first: impl IntoIterator<Item = &'a str>,
    second: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for scope in first.into_iter().chain(second) {
        if !scope.is_empty() && !merged.iter().any(|s| s == scope) {
            merged.push(scope.to_owned());
        }
    }
    merged
}

fn join_segments(base: &str, segments: &[&str]) -> Result<Url, String> {
    let mut url = Url::parse(base).map_err(|e| format!("invalid issuer URI '{base}': {e}"))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| format!("issuer URI '{base}' cannot be a base"))?;
        path.pop_if_empty();
        path.extend(segments);
    }
    Ok(url)
}
