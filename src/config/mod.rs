//! Configuration loading
//!
//! Layers, lowest precedence first: built-in defaults, `repo-debugger.toml`
//! (or an explicit `--config` file), `REPO_DEBUGGER_*` environment variables.
//! CLI flags are applied afterwards by [`merge_cli_with_config`].

mod merge;

pub use merge::{merge_cli_with_config, CliOverrides};

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::path::Path;

use crate::domain::Config;

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "repo-debugger.toml";

/// Prefix for environment overrides, e.g. `REPO_DEBUGGER_MODEL`.
pub const ENV_PREFIX: &str = "REPO_DEBUGGER_";

/// Load configuration anchored at `cwd`.
///
/// An explicit `config_path` must exist; the implicit one is optional.
pub fn load_config(cwd: &Path, config_path: Option<&Path>) -> Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    match config_path {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            figment = figment.merge(Toml::file(path));
        }
        None => {
            let implicit = cwd.join(CONFIG_FILE_NAME);
            if implicit.is_file() {
                tracing::debug!("Using config file {}", implicit.display());
                figment = figment.merge(Toml::file(implicit));
            }
        }
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    figment.extract().context("Invalid configuration")
}
