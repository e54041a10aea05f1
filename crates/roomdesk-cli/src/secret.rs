//! Secret reference resolver.
//!
//! Values in `config.toml` can point at secrets stored outside the file:
//!
//! - `pass::path/in/store`: runs `pass show path/in/store`, returns the first line
//! - `env::VAR_NAME`: reads `$VAR_NAME` from the environment
//! - anything else is returned as-is

use thiserror::Error;

/// Errors resolving a secret reference.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("failed to run `pass show {path}`: {source}")]
    PassSpawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`pass show {path}` failed ({status}): {stderr}")]
    PassFailed {
        path: String,
        status: String,
        stderr: String,
    },

    #[error("`pass show {0}` produced no output")]
    PassEmpty(String),

    #[error("environment variable `{0}` is not set")]
    EnvMissing(String),
}

/// Resolves a value that may carry a `pass::` or `env::` prefix.
pub fn resolve(value: &str) -> Result<String, SecretError> {
    if let Some(path) = value.strip_prefix("pass::") {
        resolve_pass(path)
    } else if let Some(var) = value.strip_prefix("env::") {
        resolve_env(var)
    } else {
        Ok(value.to_string())
    }
}

/// Whether `value` refers to a secret instead of holding it.
pub fn is_reference(value: &str) -> bool {
    value.starts_with("pass::") || value.starts_with("env::")
}

fn resolve_pass(path: &str) -> Result<String, SecretError> {
    let output = std::process::Command::new("pass")
        .arg("show")
        .arg(path)
        .output()
        .map_err(|source| SecretError::PassSpawn {
            path: path.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(SecretError::PassFailed {
            path: path.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(str::to_string)
        .ok_or_else(|| SecretError::PassEmpty(path.to_string()))
}

fn resolve_env(var: &str) -> Result<String, SecretError> {
    std::env::var(var).map_err(|_| SecretError::EnvMissing(var.to_string()))
}
