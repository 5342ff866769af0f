use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// RADIUS authenticator configuration
///
/// Read-only during an authentication pass. The host application decides
/// whether RADIUS applies at all by checking [`RadiusConfig::is_configured`]
/// before invoking the authenticator; a config without a host or shared
/// secret routes the host to its normal authentication path instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadiusConfig {
    /// RADIUS server hostname or IP address
    #[serde(default)]
    pub host: Option<String>,

    /// RADIUS server port (default: 1812)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shared secret issued by the RADIUS server
    #[serde(default)]
    pub shared_secret: Option<String>,

    /// How long to wait for a response from the RADIUS server, in seconds
    /// (default: 2)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Name of the credential field carrying the RADIUS login
    /// (default: "radius_login")
    #[serde(default = "default_login_field")]
    pub login_field: String,

    /// Create a local user record on first successful authentication
    /// (default: true)
    #[serde(default = "default_auto_register")]
    pub auto_register: bool,

    /// Domain used for auto-registered accounts when the login itself does
    /// not carry one (e.g. the user typed "alice" rather than "alice@corp")
    #[serde(default)]
    pub auto_register_domain: Option<String>,
}

fn default_port() -> u16 {
    1812
}

fn default_timeout_secs() -> u64 {
    2
}

fn default_login_field() -> String {
    "radius_login".to_string()
}

fn default_auto_register() -> bool {
    true
}

impl Default for RadiusConfig {
    fn default() -> Self {
        RadiusConfig {
            host: None,
            port: default_port(),
            shared_secret: None,
            timeout_secs: default_timeout_secs(),
            login_field: default_login_field(),
            auto_register: default_auto_register(),
            auto_register_domain: None,
        }
    }
}

impl RadiusConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: RadiusConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Create an example configuration
    pub fn example() -> Self {
        RadiusConfig {
            host: Some("radius.example.com".to_string()),
            shared_secret: Some("changeme".to_string()),
            auto_register_domain: Some("example.com".to_string()),
            ..RadiusConfig::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref host) = self.host {
            if host.is_empty() {
                return Err(ConfigError::Invalid("host must not be empty".into()));
            }
        }
        if let Some(ref secret) = self.shared_secret {
            if secret.is_empty() {
                return Err(ConfigError::Invalid(
                    "shared_secret must not be empty".into(),
                ));
            }
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be non-zero".into()));
        }
        if self.login_field.is_empty() {
            return Err(ConfigError::Invalid("login_field must not be empty".into()));
        }
        Ok(())
    }

    /// Whether both host and shared secret are present, i.e. whether an
    /// authentication attempt counts as "using RADIUS" at all
    pub fn is_configured(&self) -> bool {
        self.host.is_some() && self.shared_secret.is_some()
    }

    /// The network deadline for one authentication attempt
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `host:port` string for server address resolution
    pub fn server_addr(&self) -> Option<String> {
        self.host
            .as_ref()
            .map(|host| format!("{}:{}", host, self.port))
    }
}
