//! Helpers shared by the CLI entry points

use crate::config::{CONFIG_FILE_NAME, Config};
use crate::error::ConfigError;
use std::path::Path;

/// No notebook has blocking findings and nothing failed
pub const EXIT_SUCCESS: i32 = 0;
/// Blocking findings, a fatal error, or a usage error
pub const EXIT_FAILURE: i32 = 1;

/// Load configuration
///
/// An explicit path must exist. Without one, `./nbaudit.toml` is used when
/// present and built-in defaults otherwise.
///
/// # Errors
///
/// Returns `ConfigError` if the chosen file cannot be read or is invalid.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        log::debug!("loading configuration from {}", path.display());
        return Config::load(path);
    }

    let default_path = Path::new(CONFIG_FILE_NAME);
    if default_path.is_file() {
        log::debug!("loading configuration from {}", default_path.display());
        return Config::load(default_path);
    }

    log::debug!("no {} found, using defaults", CONFIG_FILE_NAME);
    Ok(Config::default())
}
