//! rustls setup for the HTTPS connector.

use std::sync::{Arc, OnceLock};

use hyper_rustls::HttpsConnectorBuilder;
use hyper_rustls::builderstates::WantsSchemes;
use rustls::ClientConfig;
use rustls::crypto::CryptoProvider;
use rustls_pki_types::CertificateDer;

use crate::config::TrustRoots;
use crate::error::HttpError;

static STORE_CERTS: OnceLock<Vec<CertificateDer<'static>>> = OnceLock::new();

/// Certificates of the container's trust store, read on first use.
fn store_certs() -> &'static [CertificateDer<'static>] {
    STORE_CERTS.get_or_init(|| {
        let loaded = rustls_native_certs::load_native_certs();
        for err in &loaded.errors {
            tracing::warn!(error = %err, "skipping unreadable trust store entry");
        }
        tracing::debug!(count = loaded.certs.len(), "read trust store");
        loaded.certs
    })
}

/// The installed process provider, or aws-lc-rs without installing it.
fn provider() -> Arc<CryptoProvider> {
    CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

fn tls_error(message: String) -> HttpError {
    HttpError::Tls(message.into())
}

/// Client config anchored in the container's trust store.
///
/// Fails up front when no usable certificate is found, rather than at the
/// first handshake.
fn store_client_config() -> Result<ClientConfig, HttpError> {
    let certs = store_certs();
    let mut roots = rustls::RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(certs.iter().cloned());
    if ignored > 0 {
        tracing::warn!(added, ignored, "some trust store certificates did not parse");
    }
    if added == 0 {
        return Err(tls_error(format!(
            "trust store has no usable CA certificate ({} found)",
            certs.len()
        )));
    }

    Ok(ClientConfig::builder_with_provider(provider())
        .with_safe_default_protocol_versions()
        .map_err(|e| tls_error(format!("protocol versions: {e}")))?
        .with_root_certificates(roots)
        .with_no_client_auth())
}

/// Connector builder anchored in the requested roots.
pub fn connector_builder(
    roots: TrustRoots,
) -> Result<HttpsConnectorBuilder<WantsSchemes>, HttpError> {
    match roots {
        TrustRoots::Webpki => HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(provider())
            .map_err(|e| HttpError::Tls(Box::new(e))),
        TrustRoots::Native => {
            Ok(HttpsConnectorBuilder::new().with_tls_config(store_client_config()?))
        }
    }
}
