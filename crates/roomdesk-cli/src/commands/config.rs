//! Configuration commands.

use crate::config::Config;
use crate::error::{CliError, CliResult};
use crate::secret;

/// Dump the current configuration to stdout.
pub fn dump(config: &Config) -> CliResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| CliError::config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", Config::default_path().display());
    println!("{}", toml_str);
    Ok(())
}

/// Validate the configuration, resolving secret references.
pub fn validate(config: &Config) -> CliResult<()> {
    let backend = &config.backend;
    if backend.base_url.is_some() || backend.csrf_token.is_some() {
        let client = backend.to_client_config(None, None)?;
        println!("Backend: {}", client.base_url);
    }
    if let Some(ref cookie) = backend.session_cookie
        && secret::is_reference(cookie)
    {
        secret::resolve(cookie)?;
        println!("Session cookie reference resolves.");
    }

    if config.notifications.expiry_ms == 0 {
        return Err(CliError::config("notifications.expiry_ms must be positive"));
    }

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path() -> CliResult<()> {
    println!("config: {}", Config::default_path().display());
    Ok(())
}
