//! Configuration file loading for the CLI.

use std::fs;

use log::{debug, info};

use scrawl::config::AppConfig;

use crate::CliError;

/// Loads the application configuration.
///
/// With no path, the defaults are used. A configured path must exist and
/// parse as TOML; errors are reported rather than silently defaulted.
pub(crate) fn load_config(path: Option<&String>) -> Result<AppConfig, CliError> {
    let Some(path) = path else {
        debug!("No configuration file given, using defaults");
        return Ok(AppConfig::default());
    };

    let contents = fs::read_to_string(path)
        .map_err(|err| CliError::Config(format!("cannot read `{path}`: {err}")))?;
    let config: AppConfig = toml::from_str(&contents)
        .map_err(|err| CliError::Config(format!("cannot parse `{path}`: {err}")))?;

    info!(path; "Loaded configuration");
    Ok(config)
}
