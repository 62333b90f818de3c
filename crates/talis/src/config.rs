//! Configuration management for the server binary.
//!
//! Settings are loaded from a TOML file. A missing file is created with the
//! defaults so a fresh install starts with something to edit.

use anyhow::{anyhow, Context};
use portal_server::{ServerConfig, TlsSettings};
use serde::{Deserialize, Serialize};
use session_bus::Encoding;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub portal: PortalSettings,
    #[serde(default)]
    pub bus: BusSettings,
    #[serde(default)]
    pub game: GameSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Client-facing listeners.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    /// Cleartext listener address
    pub bind_address: String,
    /// Serve TLS next to cleartext; turning it off is explicit
    pub tls_enabled: bool,
    /// TLS listener address
    pub tls_bind_address: String,
    /// PEM certificate chain
    pub cert_path: String,
    /// PEM private key
    pub key_path: String,
    /// Seconds a client gets to complete the TLS handshake
    pub tls_handshake_timeout_secs: u64,
    /// Size of a single socket read
    pub read_chunk_size: usize,
    /// Longest unterminated line before the client is dropped
    pub max_line_length: usize,
    /// Text encoding of clients (utf-8, latin-1 or ascii)
    pub encoding: String,
    /// Frames waiting for a client before it is dropped as not reading
    pub outbound_queue_limit: usize,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:4000".to_string(),
            tls_enabled: true,
            tls_bind_address: "0.0.0.0:4001".to_string(),
            cert_path: ".ssl/telnet.cert".to_string(),
            key_path: ".ssl/telnet.key".to_string(),
            tls_handshake_timeout_secs: 10,
            read_chunk_size: 1024,
            max_line_length: 4096,
            encoding: "utf-8".to_string(),
            outbound_queue_limit: 1024,
        }
    }
}

/// Link between the portal and the game process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BusSettings {
    /// The portal listens here, the game connects here
    pub address: String,
    /// Delay between two connection attempts of the game process
    pub reconnect_delay_ms: u64,
}

impl Default for BusSettings {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:4005".to_string(),
            reconnect_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Text sent to every new session
    pub welcome: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            welcome: "Welcome to Talis!".to_string(),
        }
    }
}

/// Logging system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file, writing the defaults there first
    /// when the file does not exist.
    pub async fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let config = toml::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Checks addresses, sizes, encoding and log level.
    pub fn validate(&self) -> Result<(), String> {
        if self.portal.bind_address.parse::<SocketAddr>().is_err() {
            return Err(format!("Invalid bind address: {}", self.portal.bind_address));
        }
        if self.portal.tls_enabled {
            let tls = &self.portal.tls_bind_address;
            if tls.parse::<SocketAddr>().is_err() {
                return Err(format!("Invalid TLS bind address: {tls}"));
            }
            if self.portal.cert_path.is_empty() || self.portal.key_path.is_empty() {
                return Err("TLS needs both cert_path and key_path".to_string());
            }
            if self.portal.tls_handshake_timeout_secs == 0 {
                return Err("tls_handshake_timeout_secs must be greater than 0".to_string());
            }
        }
        if self.bus.address.parse::<SocketAddr>().is_err() {
            return Err(format!("Invalid bus address: {}", self.bus.address));
        }
        if self.portal.read_chunk_size == 0 {
            return Err("read_chunk_size must be greater than 0".to_string());
        }
        if self.portal.max_line_length == 0 {
            return Err("max_line_length must be greater than 0".to_string());
        }
        if self.portal.outbound_queue_limit == 0 {
            return Err("outbound_queue_limit must be greater than 0".to_string());
        }
        self.portal.encoding.parse::<Encoding>()?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                self.logging.level
            ));
        }

        Ok(())
    }

    pub fn bus_address(&self) -> anyhow::Result<SocketAddr> {
        self.bus
            .address
            .parse()
            .with_context(|| format!("invalid bus address {}", self.bus.address))
    }

    /// Converts the `[portal]` section into the portal's own configuration.
    pub fn to_server_config(&self) -> anyhow::Result<ServerConfig> {
        let tls = if self.portal.tls_enabled {
            let address = &self.portal.tls_bind_address;
            Some(TlsSettings {
                bind_address: address
                    .parse()
                    .with_context(|| format!("invalid TLS bind address {address}"))?,
                cert_path: PathBuf::from(&self.portal.cert_path),
                key_path: PathBuf::from(&self.portal.key_path),
                handshake_timeout: Duration::from_secs(self.portal.tls_handshake_timeout_secs),
            })
        } else {
            None
        };

        Ok(ServerConfig {
            bind_address: self
                .portal
                .bind_address
                .parse()
                .with_context(|| format!("invalid bind address {}", self.portal.bind_address))?,
            tls,
            read_chunk_size: self.portal.read_chunk_size,
            max_line_length: self.portal.max_line_length,
            encoding: self.portal.encoding.parse().map_err(|e: String| anyhow!(e))?,
            outbound_queue_limit: self.portal.outbound_queue_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("talis.toml");

        let config = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config.portal.bind_address, "0.0.0.0:4000");
        assert_eq!(config.bus.address, "127.0.0.1:4005");
        assert!(path.exists());

        let reloaded = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(reloaded.game.welcome, config.game.welcome);
    }

    #[tokio::test]
    async fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("talis.toml");
        tokio::fs::write(
            &path,
            r#"
[portal]
bind_address = "127.0.0.1:5000"
tls_bind_address = "127.0.0.1:5001"
encoding = "latin-1"

[logging]
level = "debug"
json_format = true
"#,
        )
        .await
        .unwrap();

        let config = AppConfig::load_from_file(&path).await.unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.portal.max_line_length, 4096);
        assert_eq!(config.bus.reconnect_delay_ms, 1000);
        assert!(config.logging.json_format);

        let server = config.to_server_config().unwrap();
        assert_eq!(server.bind_address.port(), 5000);
        assert_eq!(server.encoding, Encoding::Latin1);
        let tls = server.tls.unwrap();
        assert_eq!(tls.bind_address.port(), 5001);
        assert_eq!(tls.cert_path, PathBuf::from(".ssl/telnet.cert"));
    }

    #[test]
    fn test_tls_enabled_by_default() {
        let server = AppConfig::default().to_server_config().unwrap();
        let tls = server.tls.unwrap();
        assert_eq!(tls.bind_address, "0.0.0.0:4001".parse::<SocketAddr>().unwrap());
        assert_eq!(tls.cert_path, PathBuf::from(".ssl/telnet.cert"));
        assert_eq!(tls.key_path, PathBuf::from(".ssl/telnet.key"));
        assert_eq!(tls.handshake_timeout, Duration::from_secs(10));
        assert_eq!(server.outbound_queue_limit, 1024);
    }

    #[tokio::test]
    async fn test_tls_is_turned_off_explicitly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("talis.toml");
        tokio::fs::write(&path, "[portal]\ntls_enabled = false\n")
            .await
            .unwrap();

        let config = AppConfig::load_from_file(&path).await.unwrap();
        assert!(config.validate().is_ok());
        assert!(config.to_server_config().unwrap().tls.is_none());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = AppConfig::default();
        config.portal.bind_address = "nowhere".to_string();
        assert!(config.validate().unwrap_err().contains("bind address"));

        let mut config = AppConfig::default();
        config.portal.encoding = "ebcdic".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().unwrap_err().contains("Invalid log level"));

        let mut config = AppConfig::default();
        config.portal.max_line_length = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.portal.tls_bind_address = "nowhere".to_string();
        assert!(config.validate().unwrap_err().contains("TLS bind address"));

        config.portal.tls_enabled = false;
        assert!(config.validate().is_ok());
    }
}
