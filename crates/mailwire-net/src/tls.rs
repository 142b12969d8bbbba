//! TLS configuration for the protocol clients.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::WebPkiSupportedAlgorithms;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use tokio_rustls::TlsConnector;

use crate::Result;

/// Transport security mode for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// No encryption at any point.
    None,
    /// Start plaintext, upgrade with the protocol's STARTTLS command.
    StartTls,
    /// TLS from the first byte (e.g. ports 465, 993, 995).
    #[default]
    Implicit,
}

/// TLS trust configuration.
///
/// By default the platform's certificate store is used, with the bundled
/// Mozilla roots as a fallback when the platform store is empty. Additional
/// PEM certificate files or directories can be layered on top.
#[derive(Debug, Clone)]
pub struct TlsOptions {
    use_default_verify_paths: bool,
    ca_files: Vec<PathBuf>,
    ca_paths: Vec<PathBuf>,
    danger_accept_invalid_certs: bool,
}

impl Default for TlsOptions {
    fn default() -> Self {
        Self {
            use_default_verify_paths: true,
            ca_files: Vec::new(),
            ca_paths: Vec::new(),
            danger_accept_invalid_certs: false,
        }
    }
}

impl TlsOptions {
    /// Creates the default trust configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables loading the platform's default trust store.
    #[must_use]
    pub const fn use_default_verify_paths(mut self, enabled: bool) -> Self {
        self.use_default_verify_paths = enabled;
        self
    }

    /// Adds a PEM certificate file to the trust store.
    #[must_use]
    pub fn ca_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_files.push(path.into());
        self
    }

    /// Adds a directory of PEM certificate files to the trust store.
    #[must_use]
    pub fn ca_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_paths.push(path.into());
        self
    }

    /// Disables certificate and host-name verification entirely.
    ///
    /// This removes all protection against man-in-the-middle attacks and
    /// exists for test servers with self-signed certificates.
    #[must_use]
    pub const fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.danger_accept_invalid_certs = accept;
        self
    }

    /// Builds a connector from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when a configured CA file or path cannot be read.
    pub fn connector(&self) -> Result<TlsConnector> {
        let config = if self.danger_accept_invalid_certs {
            ClientConfig::builder()
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(DisabledVerifier::new()))
                .with_no_client_auth()
        } else {
            ClientConfig::builder()
                .with_root_certificates(self.root_store()?)
                .with_no_client_auth()
        };
        Ok(TlsConnector::from(Arc::new(config)))
    }

    fn root_store(&self) -> Result<RootCertStore> {
        let mut roots = RootCertStore::empty();

        if self.use_default_verify_paths {
            for cert in rustls_native_certs::load_native_certs().certs {
                let _ = roots.add(cert);
            }
            if roots.is_empty() {
                roots.roots = webpki_roots::TLS_SERVER_ROOTS.to_vec();
            }
        }

        for file in &self.ca_files {
            add_pem_file(&mut roots, file)?;
        }
        for dir in &self.ca_paths {
            for entry in std::fs::read_dir(dir)? {
                let path = entry?.path();
                if path.is_file() {
                    add_pem_file(&mut roots, &path)?;
                }
            }
        }

        Ok(roots)
    }
}

fn add_pem_file(roots: &mut RootCertStore, path: &Path) -> Result<()> {
    let mut reader = BufReader::new(File::open(path)?);
    for cert in rustls_pemfile::certs(&mut reader) {
        let _ = roots.add(cert?);
    }
    Ok(())
}

/// Certificate verifier that accepts any chain and host name.
///
/// Handshake signatures are still verified so the connection remains bound
/// to the presented key.
#[derive(Debug)]
struct DisabledVerifier {
    algorithms: WebPkiSupportedAlgorithms,
}

impl DisabledVerifier {
    fn new() -> Self {
        Self {
            algorithms: rustls::crypto::ring::default_provider().signature_verification_algorithms,
        }
    }
}

impl ServerCertVerifier for DisabledVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(message, cert, dss, &self.algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(message, cert, dss, &self.algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.algorithms.supported_schemes()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_connector_builds() {
        let connector = TlsOptions::new().connector();
        assert!(connector.is_ok());
    }

    #[test]
    fn danger_connector_builds() {
        let connector = TlsOptions::new()
            .danger_accept_invalid_certs(true)
            .connector();
        assert!(connector.is_ok());
    }

    #[test]
    fn default_mode_is_implicit() {
        assert_eq!(TlsMode::default(), TlsMode::Implicit);
    }
}
