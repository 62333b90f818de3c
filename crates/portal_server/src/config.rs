//! Portal configuration types and defaults.

use crate::connection::Encoding;
use crate::error::ServerError;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Settings of the TLS endpoint.
#[derive(Debug, Clone)]
pub struct TlsSettings {
    /// Address of the TLS listener
    pub bind_address: SocketAddr,
    /// PEM certificate chain
    pub cert_path: PathBuf,
    /// PEM private key
    pub key_path: PathBuf,
    /// Longest time a client may take to complete the handshake
    pub handshake_timeout: Duration,
}

impl Default for TlsSettings {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 4001)),
            cert_path: PathBuf::from(".ssl/telnet.cert"),
            key_path: PathBuf::from(".ssl/telnet.key"),
            handshake_timeout: Duration::from_secs(10),
        }
    }
}

/// Configuration of the portal server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address of the cleartext listener
    pub bind_address: SocketAddr,

    /// TLS endpoint. Enabled by default; only an explicit `None` turns it
    /// off.
    pub tls: Option<TlsSettings>,

    /// Size of a single socket read
    pub read_chunk_size: usize,

    /// Longest unterminated line accepted before the client is dropped
    pub max_line_length: usize,

    /// Encoding used for outbound text
    pub encoding: Encoding,

    /// Frames a session may have waiting for its writer. A client that lets
    /// more pile up is disconnected.
    pub outbound_queue_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 4000)),
            tls: Some(TlsSettings::default()),
            read_chunk_size: 1024,
            max_line_length: 4096,
            encoding: Encoding::Utf8,
            outbound_queue_limit: 1024,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.read_chunk_size == 0 {
            return Err(ServerError::Config("read_chunk_size must be greater than 0".into()));
        }
        if self.max_line_length == 0 {
            return Err(ServerError::Config("max_line_length must be greater than 0".into()));
        }
        if self.outbound_queue_limit == 0 {
            return Err(ServerError::Config("outbound_queue_limit must be greater than 0".into()));
        }
        if let Some(tls) = &self.tls {
            if tls.handshake_timeout.is_zero() {
                return Err(ServerError::Config("TLS handshake timeout must be greater than 0".into()));
            }
            if tls.bind_address == self.bind_address && tls.bind_address.port() != 0 {
                return Err(ServerError::Config(format!(
                    "cleartext and TLS endpoints both use {}",
                    tls.bind_address
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address.port(), 4000);
        assert_eq!(config.read_chunk_size, 1024);
        assert_eq!(config.max_line_length, 4096);
        assert_eq!(config.outbound_queue_limit, 1024);
        assert!(config.validate().is_ok());

        let tls = config.tls.unwrap();
        assert_eq!(tls.bind_address, SocketAddr::from(([0, 0, 0, 0], 4001)));
        assert_eq!(tls.cert_path, PathBuf::from(".ssl/telnet.cert"));
        assert_eq!(tls.key_path, PathBuf::from(".ssl/telnet.key"));
    }

    #[test]
    fn test_zero_limits_are_rejected() {
        let config = ServerConfig {
            outbound_queue_limit: 0,
            ..ServerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));

        let config = ServerConfig {
            tls: Some(TlsSettings {
                handshake_timeout: Duration::ZERO,
                ..TlsSettings::default()
            }),
            ..ServerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn test_same_port_for_both_endpoints_is_rejected() {
        let config = ServerConfig {
            tls: Some(TlsSettings {
                bind_address: SocketAddr::from(([0, 0, 0, 0], 4000)),
                ..TlsSettings::default()
            }),
            ..ServerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }
}
