use std::io::Cursor;
use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::client::WebPkiServerVerifier;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, Error as TlsError, RootCertStore, SignatureScheme};

use super::TlsConfig;
use crate::error::Error;

pub(super) async fn configure(config: &TlsConfig) -> Result<Arc<ClientConfig>, Error> {
    let builder = ClientConfig::builder();

    let config = match config {
        TlsConfig::None => {
            // Only reachable if a caller constructs `TlsParams` with `TlsConfig::None` and
            // still calls `upgrade`; `maybe_upgrade` never does this.
            return Err(Error::configuration("TLS was not configured for this connection"));
        }

        TlsConfig::FromContext(context) => return Ok(Arc::clone(context)),

        TlsConfig::Trusted { verify_hostname } => {
            let roots = trusted_roots();
            with_roots(builder, roots, *verify_hostname)
        }

        TlsConfig::FromTrustStore { ca, verify_hostname } => {
            let mut roots = trusted_roots();
            let data = ca.data().await.map_err(Error::Io)?;
            let mut cursor = Cursor::new(data);

            for cert in rustls_pemfile::certs(&mut cursor) {
                roots
                    .add(cert.map_err(|e| Error::tls(std::io::Error::from(e)))?)
                    .map_err(|e| Error::tls(TlsErrorWrapper(e)))?;
            }

            with_roots(builder, roots, *verify_hostname)
        }
    };

    Ok(Arc::new(config))
}

fn trusted_roots() -> RootCertStore {
    let mut store = RootCertStore::empty();
    store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    store
}

fn with_roots(
    builder: rustls::ConfigBuilder<ClientConfig, rustls::WantsVerifier>,
    roots: RootCertStore,
    verify_hostname: bool,
) -> ClientConfig {
    if verify_hostname {
        builder
            .with_root_certificates(roots)
            .with_no_client_auth()
    } else {
        let verifier = WebPkiServerVerifier::builder(Arc::new(roots))
            .build()
            .expect("static root store is always valid");

        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(NoHostnameVerifier { verifier }))
            .with_no_client_auth()
    }
}

#[derive(Debug)]
struct TlsErrorWrapper(TlsError);

impl std::fmt::Display for TlsErrorWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TlsErrorWrapper {}

/// Accepts the chain as presented but skips the hostname check, for `ssl=verify_ca`.
#[derive(Debug)]
struct NoHostnameVerifier {
    verifier: Arc<WebPkiServerVerifier>,
}

impl ServerCertVerifier for NoHostnameVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, TlsError> {
        // Re-verify against a placeholder name so chain/expiry/trust are still checked;
        // only the hostname match is skipped.
        let placeholder = ServerName::try_from("localhost").expect("valid DNS name");
        self.verifier.verify_server_cert(
            end_entity,
            intermediates,
            &placeholder,
            ocsp_response,
            now,
        )
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        self.verifier.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        self.verifier.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.verifier.supported_verify_schemes()
    }
}
