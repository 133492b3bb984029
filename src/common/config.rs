//! Configuration for the REST daemon
//!
//! Values are layered: built-in defaults, then an optional TOML file
//! (`--config` or `GLUSTER_BLOCK_REST_CONFIG`), then `GBREST_*` environment
//! variables. Command-line flags are applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::common::{Error, Result};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "GLUSTER_BLOCK_REST_CONFIG";

/// Prefix for environment overrides (`GBREST_ADDR`, `GBREST_AUTH__ENABLED`, ...)
pub const ENV_PREFIX: &str = "GBREST";

/// Daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bind address for the HTTP API
    #[serde(default = "default_addr")]
    pub addr: SocketAddr,

    /// Path (or name on $PATH) of the gluster-block binary
    #[serde(default = "default_cli_path")]
    pub cli_path: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Maximum accepted request body, in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,

    #[serde(default)]
    pub tls: TlsConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8081))
}
fn default_cli_path() -> String {
    "gluster-block".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_body_limit() -> usize {
    1024 * 1024
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            cli_path: default_cli_path(),
            log_level: default_log_level(),
            body_limit: default_body_limit(),
            tls: TlsConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

/// TLS termination
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TlsConfig {
    #[serde(default)]
    pub enabled: bool,
    pub cert_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
}

/// JWT authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Whether authentication is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Shared HS256 secret per token issuer
    #[serde(default)]
    pub issuers: HashMap<String, String>,

    /// Paths (and their subpaths) reachable without a token
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
}

fn default_public_paths() -> Vec<String> {
    vec!["/ping".to_string()]
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            issuers: HashMap::new(),
            public_paths: default_public_paths(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the file named by
    /// [`CONFIG_ENV`] when `path` is `None`. A missing file is only an
    /// error when it was named explicitly.
    ///
    /// The result is not validated: command-line overrides still have to
    /// be applied, so callers run [`Config::validate`] after merging them.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
        let file = path.map(Path::to_path_buf).or(from_env);

        let mut builder = config::Config::builder();
        if let Some(file) = &file {
            if !file.exists() {
                return Err(Error::InvalidConfig(format!(
                    "config file not found: {}",
                    file.display()
                )));
            }
            builder = builder.add_source(config::File::from(file.as_path()));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.cli_path.trim().is_empty() {
            return Err(Error::InvalidConfig("cli_path must not be empty".into()));
        }
        if self.tls.enabled && (self.tls.cert_file.is_none() || self.tls.key_file.is_none()) {
            return Err(Error::InvalidConfig(
                "tls.enabled requires tls.cert_file and tls.key_file".into(),
            ));
        }
        if self.auth.enabled && self.auth.issuers.is_empty() {
            return Err(Error::InvalidConfig(
                "auth.enabled requires at least one entry in auth.issuers".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.addr, "0.0.0.0:8081".parse().unwrap());
        assert_eq!(config.cli_path, "gluster-block");
        assert_eq!(config.log_level, "info");
        assert!(!config.tls.enabled);
        assert!(!config.auth.enabled);
        assert_eq!(config.auth.public_paths, vec!["/ping".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
addr = "127.0.0.1:9000"
cli_path = "/usr/sbin/gluster-block"

[auth]
enabled = true

[auth.issuers]
heketi = "s3cret"
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.cli_path, "/usr/sbin/gluster-block");
        assert!(config.auth.enabled);
        assert_eq!(config.auth.issuers.get("heketi").unwrap(), "s3cret");
        assert_eq!(config.body_limit, 1024 * 1024);
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = Config::load(Some(Path::new("/nonexistent/gbrest.toml"))).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_tls_needs_files() {
        let mut config = Config::default();
        config.tls.enabled = true;
        assert!(config.validate().is_err());
        config.tls.cert_file = Some("cert.pem".into());
        config.tls.key_file = Some("key.pem".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tls_file_completed_by_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[tls]\nenabled = true").unwrap();

        let mut config = Config::load(Some(file.path())).unwrap();
        assert!(config.tls.enabled);
        assert!(config.validate().is_err());

        config.tls.cert_file = Some("/etc/ssl/gbrest.pem".into());
        config.tls.key_file = Some("/etc/ssl/gbrest.key".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_auth_needs_issuers() {
        let mut config = Config::default();
        config.auth.enabled = true;
        assert!(config.validate().is_err());
    }
}
