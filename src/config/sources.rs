//! Config sources: global file, explicit file, environment.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path to the global config file.
///
/// `$XDG_CONFIG_HOME/treehash/config.toml` when set, otherwise the platform
/// config directory.
pub fn global_config_path() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(xdg).join("treehash").join("config.toml"));
    }
    ProjectDirs::from("", "", "treehash").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Add a config file to the builder. Optional files that do not exist are skipped.
pub fn add_file(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    required: bool,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if !required && !path.exists() {
        debug!(config_path = %path.display(), "config file not present");
        return Ok(builder);
    }
    debug!(config_path = %path.display(), "loading config file");
    Ok(builder.add_source(File::from(path).required(required)))
}

/// Add `TREEHASH_*` environment overrides; `__` separates sections
/// (`TREEHASH_SCAN__WORKERS=4`).
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("TREEHASH")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}
