//! CLI argument merging with config

use crate::domain::Config;
use std::path::PathBuf;

#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub directory: Option<PathBuf>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub extra_excluded_extensions: Option<Vec<String>>,
    pub exclude_globs: Option<Vec<String>>,
    pub follow_symlinks: Option<bool>,
    pub max_depth: Option<usize>,
    pub max_attempts: Option<u32>,
    pub retry_delay_secs: Option<u64>,
}

pub fn merge_cli_with_config(mut base_config: Config, cli: CliOverrides) -> Config {
    if let Some(directory) = cli.directory {
        base_config.directory = directory;
    }
    if let Some(model) = cli.model {
        base_config.model = model;
    }
    if let Some(max_tokens) = cli.max_tokens {
        base_config.max_tokens = max_tokens;
    }

    // Extensions given on the command line extend the configured list.
    if let Some(extra) = cli.extra_excluded_extensions {
        for ext in extra {
            if !base_config.excluded_extensions.contains(&ext) {
                base_config.excluded_extensions.push(ext);
            }
        }
    }
    if let Some(exclude_globs) = cli.exclude_globs {
        base_config.exclude_globs = exclude_globs;
    }
    if let Some(follow_symlinks) = cli.follow_symlinks {
        base_config.follow_symlinks = follow_symlinks;
    }
    if let Some(max_depth) = cli.max_depth {
        base_config.max_depth = Some(max_depth);
    }

    if let Some(max_attempts) = cli.max_attempts {
        base_config.retry.max_attempts = max_attempts;
    }
    if let Some(retry_delay_secs) = cli.retry_delay_secs {
        base_config.retry.delay_secs = retry_delay_secs;
    }

    base_config
}
