//! Configuration sources, lowest precedence first: global file, workspace file, environment.

pub mod environment;

use crate::config::paths;
use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};
use std::path::Path;

/// Workspace-level config file name
pub const WORKSPACE_CONFIG_FILE: &str = "playground.toml";

/// Optional `$XDG_CONFIG_HOME/playground/config.toml`.
pub fn add_global_file(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    match paths::global_config_file() {
        Ok(path) => builder.add_source(File::from(path).format(FileFormat::Toml).required(false)),
        Err(e) => {
            tracing::debug!("Skipping global config file: {}", e);
            builder
        }
    }
}

/// Optional `<workspace>/playground.toml`.
pub fn add_workspace_file(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> ConfigBuilder<DefaultState> {
    let path = workspace_root.join(WORKSPACE_CONFIG_FILE);
    builder.add_source(File::from(path).format(FileFormat::Toml).required(false))
}
