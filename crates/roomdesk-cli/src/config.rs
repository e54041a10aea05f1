//! CLI configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/roomdesk/config.toml` by default:
//!
//! ```toml
//! [backend]
//! base_url = "https://rooms.example.org/"
//! csrf_token = "env::ROOMDESK_CSRF"
//! session_cookie = "pass::roomdesk/session"
//!
//! [notifications]
//! expiry_ms = 10000
//! rearm_on_leave = false
//! ```
//!
//! `csrf_token` and `session_cookie` support secret references
//! (`pass::…`, `env::…`, see [`crate::secret`]).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use roomdesk_calendar::NotifyConfig;
use roomdesk_client::ClientConfig;

use crate::error::{CliError, CliResult};
use crate::secret;

/// Configuration for the roomdesk CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Debug logging.
    pub debug: bool,

    /// Reservation server settings.
    pub backend: BackendSettings,

    /// Notification tray settings.
    pub notifications: NotificationSettings,
}

/// Reservation server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Site root serving `reservations/...`.
    pub base_url: Option<String>,

    /// CSRF token (supports `pass::` and `env::` prefixes).
    pub csrf_token: Option<String>,

    /// `Cookie` header value for the session (supports `pass::` and `env::`).
    pub session_cookie: Option<String>,

    /// Request timeout in seconds. No timeout when unset.
    pub timeout: Option<u64>,

    /// Verify TLS certificates.
    pub verify_tls: bool,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            csrf_token: None,
            session_cookie: None,
            timeout: None,
            verify_tls: true,
        }
    }
}

/// Notification tray settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Milliseconds before an unhovered notification disappears.
    pub expiry_ms: u64,

    /// Milliseconds before a notification expands.
    pub expand_delay_ms: u64,

    /// Restart the expiry once the pointer leaves the tray.
    pub rearm_on_leave: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            expiry_ms: NotifyConfig::DEFAULT_EXPIRY.as_millis() as u64,
            expand_delay_ms: NotifyConfig::DEFAULT_EXPAND_DELAY.as_millis() as u64,
            rearm_on_leave: false,
        }
    }
}

impl NotificationSettings {
    pub fn to_notify_config(&self) -> NotifyConfig {
        NotifyConfig::default()
            .with_expiry(Duration::from_millis(self.expiry_ms))
            .with_expand_delay(Duration::from_millis(self.expand_delay_ms))
            .with_rearm_on_leave(self.rearm_on_leave)
    }
}

impl BackendSettings {
    /// Builds the HTTP client configuration, resolving secret references.
    ///
    /// `base_url` and `csrf_token` override the file's values when given.
    pub fn to_client_config(
        &self,
        base_url: Option<&str>,
        csrf_token: Option<&str>,
    ) -> CliResult<ClientConfig> {
        let base_url = base_url.or(self.base_url.as_deref()).ok_or_else(|| {
            CliError::config(format!(
                "no backend base_url. Add to {}:\n  \
                 [backend]\n  \
                 base_url = \"https://rooms.example.org/\"\n\n  \
                 Or pass --base-url",
                Config::default_path().display()
            ))
        })?;
        let raw_csrf = csrf_token
            .or(self.csrf_token.as_deref())
            .ok_or_else(|| CliError::config("no CSRF token, set [backend] csrf_token or pass --csrf-token"))?;
        let csrf_token = secret::resolve(raw_csrf)?;

        let mut config = ClientConfig::new(base_url, csrf_token)
            .map_err(|e| CliError::config(format!("invalid base_url `{}`: {}", base_url, e)))?;

        if let Some(ref cookie) = self.session_cookie {
            config = config.with_session_cookie(secret::resolve(cookie)?);
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if !self.verify_tls {
            config = config.with_insecure_tls();
        }
        Ok(config)
    }
}

impl Config {
    /// Loads configuration from the default path, or defaults if the file
    /// does not exist.
    pub fn load() -> CliResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| CliError::config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("roomdesk")
    }
}
