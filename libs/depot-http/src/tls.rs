//! TLS setup for the HTTPS connector.
//!
//! Native roots are read from the OS store at most once per process.

use crate::config::{TlsRootConfig, TransportSecurity};
use crate::error::HttpError;
use hyper_rustls::{ConfigBuilderExt as _, HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use rustls_pki_types::CertificateDer;
use std::sync::{Arc, OnceLock};

static NATIVE_ROOTS: OnceLock<Vec<CertificateDer<'static>>> = OnceLock::new();

fn native_root_certs() -> &'static [CertificateDer<'static>] {
    NATIVE_ROOTS.get_or_init(|| {
        let loaded = rustls_native_certs::load_native_certs();
        for err in &loaded.errors {
            tracing::warn!(error = %err, "failed to load a native root certificate");
        }
        tracing::debug!(count = loaded.certs.len(), "loaded native root certificates");
        loaded.certs
    })
}

/// Crypto provider: the process default if one is installed, else aws-lc-rs.
fn crypto_provider() -> Arc<rustls::crypto::CryptoProvider> {
    rustls::crypto::CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

fn tls_error(message: impl Into<String>) -> HttpError {
    let message: String = message.into();
    HttpError::Tls(message.into())
}

/// Build a rustls client config for the requested root set.
///
/// # Errors
/// `HttpError::Tls` when the OS store yields no usable certificate or the
/// provider rejects the default protocol versions.
pub fn client_config(roots: TlsRootConfig) -> Result<rustls::ClientConfig, HttpError> {
    let builder = rustls::ClientConfig::builder_with_provider(crypto_provider())
        .with_safe_default_protocol_versions()
        .map_err(|e| HttpError::Tls(Box::new(e)))?;

    let config = match roots {
        TlsRootConfig::WebPki => builder.with_webpki_roots().with_no_client_auth(),
        TlsRootConfig::Native => {
            let certs = native_root_certs();
            if certs.is_empty() {
                return Err(tls_error("OS certificate store has no root certificates"));
            }
            let mut store = rustls::RootCertStore::empty();
            let (added, ignored) = store.add_parsable_certificates(certs.iter().cloned());
            if added == 0 {
                return Err(tls_error(format!(
                    "none of the {ignored} native root certificates could be parsed"
                )));
            }
            builder.with_root_certificates(store).with_no_client_auth()
        }
    };
    Ok(config)
}

/// HTTPS connector with ALPN for HTTP/1.1 and HTTP/2.
///
/// Plain `http://` is only dialled when `transport` allows it.
///
/// # Errors
/// Propagates [`client_config`] failures.
pub fn https_connector(
    roots: TlsRootConfig,
    transport: TransportSecurity,
) -> Result<HttpsConnector<HttpConnector>, HttpError> {
    let builder = HttpsConnectorBuilder::new().with_tls_config(client_config(roots)?);
    let connector = match transport {
        TransportSecurity::AllowInsecureHttp => {
            builder.https_or_http().enable_all_versions().build()
        }
        TransportSecurity::TlsOnly => builder.https_only().enable_all_versions().build(),
    };
    Ok(connector)
}
