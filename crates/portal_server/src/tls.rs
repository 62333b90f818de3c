//! TLS acceptor construction from PEM files.

use crate::error::ServerError;
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::ServerConfig as TlsServerConfig;
use std::path::Path;
use std::sync::Arc;
use tokio_rustls::TlsAcceptor;

/// Loads a certificate chain and a private key and builds an acceptor.
///
/// Missing or unparsable material is an error; the caller treats it as fatal
/// at startup.
pub fn load_acceptor(cert_path: &Path, key_path: &Path) -> Result<TlsAcceptor, ServerError> {
    let cert_pem = read_pem(cert_path, "certificate")?;
    let key_pem = read_pem(key_path, "private key")?;

    let certs = parse_certificates(&cert_pem)?;
    if certs.is_empty() {
        return Err(ServerError::Tls(format!(
            "no certificate found in {}",
            cert_path.display()
        )));
    }
    let key = parse_private_key(&key_pem)?;

    let config = TlsServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| ServerError::Tls(format!("server config error: {e}")))?;

    Ok(TlsAcceptor::from(Arc::new(config)))
}

fn read_pem(path: &Path, what: &str) -> Result<Vec<u8>, ServerError> {
    std::fs::read(path)
        .map_err(|e| ServerError::Tls(format!("failed to read {what} {}: {e}", path.display())))
}

fn parse_certificates(pem: &[u8]) -> Result<Vec<CertificateDer<'static>>, ServerError> {
    CertificateDer::pem_slice_iter(pem)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServerError::Tls(format!("failed to parse certificates: {e}")))
}

fn parse_private_key(pem: &[u8]) -> Result<PrivateKeyDer<'static>, ServerError> {
    PrivateKeyDer::from_pem_slice(pem)
        .map_err(|e| ServerError::Tls(format!("failed to parse private key: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_acceptor(&dir.path().join("telnet.cert"), &dir.path().join("telnet.key"));

        match result {
            Err(ServerError::Tls(message)) => assert!(message.contains("telnet.cert")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("acceptor built without certificate"),
        }
    }

    #[test]
    fn test_file_without_certificate_is_rejected() {
        let mut cert = tempfile::NamedTempFile::new().unwrap();
        writeln!(cert, "not a certificate").unwrap();
        let mut key = tempfile::NamedTempFile::new().unwrap();
        writeln!(key, "not a key").unwrap();

        assert!(matches!(
            load_acceptor(cert.path(), key.path()),
            Err(ServerError::Tls(_))
        ));
    }
}
