//! Workspace config files: config/config.toml, then config/<env>.toml

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Selects the environment-specific workspace file.
pub const ENV_VAR: &str = "STACKSTATE_ENV";
const DEFAULT_ENV: &str = "development";

/// Existing workspace config files, lowest precedence first.
pub fn workspace_config_files(workspace_root: &Path, env_name: &str) -> Vec<PathBuf> {
    let config_dir = workspace_root.join("config");
    [
        config_dir.join("config.toml"),
        config_dir.join(format!("{}.toml", env_name)),
    ]
    .into_iter()
    .filter(|path| path.is_file())
    .collect()
}

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let env_name = std::env::var(ENV_VAR).unwrap_or_else(|_| DEFAULT_ENV.to_string());
    let files = workspace_config_files(workspace_root, &env_name);
    debug!(env = %env_name, files = files.len(), "Workspace configuration files");

    Ok(files.into_iter().fold(builder, |builder, path| {
        builder.add_source(File::from(path).required(false))
    }))
}
