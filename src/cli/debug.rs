//! Debug command implementation

use anyhow::{Context, Result};
use clap::Args;
use console::Style;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::utils::{normalize_extension, parse_csv};
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::{Config, FileMap};
use crate::exchange::{ApiKey, Exchange, HttpCompletionService, RetryPolicy};
use crate::prompt::{assemble_user_prompt, build_debug_conversation};
use crate::scan::{collect_files, CollectOptions};

#[derive(Args)]
pub struct DebugArgs {
    /// The error message or issue you are facing
    #[arg(value_name = "PROMPT")]
    pub prompt: String,

    /// Directory containing the files to debug
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Model identifier to request
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Path to config file (defaults to ./repo-debugger.toml when present)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Completion token ceiling
    #[arg(long, value_name = "TOKENS")]
    pub max_tokens: Option<u32>,

    /// Additional extensions to skip (comma-separated, e.g. '.pdf,.zip')
    #[arg(long, value_name = "EXTS")]
    pub exclude_ext: Option<String>,

    /// Skip paths matching these globs (comma-separated, e.g. '.git/**')
    #[arg(short = 'e', long, value_name = "GLOBS")]
    pub exclude_glob: Option<String>,

    /// Follow symbolic links when collecting files
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Maximum directory depth to descend (1 = root files only)
    #[arg(long, value_name = "DEPTH")]
    pub max_depth: Option<usize>,

    /// Give up after this many attempts
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Seconds to wait before retrying a failed request
    #[arg(long, value_name = "SECS")]
    pub retry_delay: Option<u64>,

    /// Print the assembled prompt instead of sending it
    #[arg(long)]
    pub print_prompt: bool,
}

pub fn run(args: DebugArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let file_config = load_config(&cwd, args.config.as_deref())?;

    let cli_overrides = CliOverrides {
        directory: args.directory.clone(),
        model: args.model.clone(),
        max_tokens: args.max_tokens,
        extra_excluded_extensions: parse_csv(&args.exclude_ext)
            .map(|exts| exts.into_iter().map(normalize_extension).collect()),
        exclude_globs: parse_csv(&args.exclude_glob),
        follow_symlinks: if args.follow_symlinks { Some(true) } else { None },
        max_depth: args.max_depth,
        max_attempts: args.max_attempts,
        retry_delay_secs: args.retry_delay,
    };
    let config = merge_cli_with_config(file_config, cli_overrides);

    if args.print_prompt {
        let files = collect(&config)?;
        println!("{}", assemble_user_prompt(&files, &args.prompt));
        return Ok(());
    }

    // Resolve the credential before touching the filesystem or network.
    let api_key = ApiKey::from_env(&config.api_key_env)?;

    let files = collect(&config)?;
    let conversation = build_debug_conversation(&files, &args.prompt);

    let service = HttpCompletionService::new(
        &config.api_base,
        api_key,
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("Failed to create HTTP client")?;
    let exchange =
        Exchange::new(service, config.model.as_str(), RetryPolicy::from_config(&config.retry))
            .with_max_tokens(config.max_tokens);

    let start_time = Instant::now();
    let reply = exchange
        .complete(&conversation)
        .with_context(|| format!("No response from model {}", config.model))?;
    tracing::debug!("Response received in {:.2}s", start_time.elapsed().as_secs_f64());

    println!("{}", colorize_reply(&reply));
    Ok(())
}

fn collect(config: &Config) -> Result<FileMap> {
    let collection = collect_files(&config.directory, &CollectOptions::from_config(config))
        .with_context(|| format!("Failed to collect files from {}", config.directory.display()))?;

    if collection.files.is_empty() {
        tracing::warn!("No files collected from {}", config.directory.display());
    }
    Ok(collection.files)
}

/// Bright cyan (256-color index 14), always, regardless of terminal detection.
fn colorize_reply(reply: &str) -> String {
    Style::new().cyan().bright().force_styling(true).apply_to(reply).to_string()
}

#[cfg(test)]
mod tests {
    use super::colorize_reply;

    #[test]
    fn reply_is_wrapped_in_fixed_bright_cyan_sequence() {
        assert_eq!(colorize_reply("check a.py"), "\u{1b}[38;5;14mcheck a.py\u{1b}[0m");
    }
}
