//! Pluggable TLS configuration.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::fs;

use crate::error::Error;

mod rustls_provider;

/// X.509 certificate/key material, either inline PEM bytes or a path to a PEM file.
#[derive(Clone, Debug)]
pub enum CertificateInput {
    Inline(Vec<u8>),
    File(PathBuf),
}

impl From<String> for CertificateInput {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.starts_with("-----BEGIN CERTIFICATE-----") {
            CertificateInput::Inline(value.into_bytes())
        } else {
            CertificateInput::File(PathBuf::from(value))
        }
    }
}

impl CertificateInput {
    async fn data(&self) -> std::io::Result<Vec<u8>> {
        match self {
            CertificateInput::Inline(v) => Ok(v.clone()),
            CertificateInput::File(path) => fs::read(path).await,
        }
    }
}

/// The pluggable TLS configurations a connection can be set up with.
#[derive(Clone, Debug, Default)]
pub enum TlsConfig {
    #[default]
    None,
    /// Trust the platform's default certificate store (webpki-roots / native roots).
    Trusted {
        verify_hostname: bool,
    },
    /// Trust a custom CA bundle loaded from a path (or inline PEM).
    FromTrustStore {
        ca: CertificateInput,
        verify_hostname: bool,
    },
    /// An already-configured `rustls::ClientConfig`, supplied by the caller.
    FromContext(Arc<rustls::ClientConfig>),
}

/// Parameters controlling one TLS upgrade attempt.
#[derive(Clone, Debug)]
pub struct TlsParams {
    pub config: TlsConfig,
    /// SNI server name; defaults to the connection host if unset.
    pub server_name: Option<String>,
}

pub(crate) async fn client_config(config: &TlsConfig) -> Result<Arc<rustls::ClientConfig>, Error> {
    rustls_provider::configure(config).await
}
