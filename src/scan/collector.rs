//! Recursive file collector

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::domain::{default_excluded_extensions, Config, FileMap};
use crate::utils::normalize_path;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("Directory does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Invalid exclude glob '{pattern}'")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// What to skip and how far to walk
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// File-name suffixes to skip, matched case-sensitively
    pub excluded_extensions: Vec<String>,

    /// Globs matched against `/`-separated relative paths
    pub exclude_globs: Vec<String>,

    pub follow_symlinks: bool,

    /// Files directly inside the root are at depth 1
    pub max_depth: Option<usize>,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            excluded_extensions: default_excluded_extensions(),
            exclude_globs: Vec::new(),
            follow_symlinks: false,
            max_depth: None,
        }
    }
}

impl CollectOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            excluded_extensions: config.excluded_extensions.clone(),
            exclude_globs: config.exclude_globs.clone(),
            follow_symlinks: config.follow_symlinks,
            max_depth: config.max_depth,
        }
    }

    fn is_excluded_name(&self, file_name: &str) -> bool {
        self.excluded_extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
    }
}

/// Counters gathered during a walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectStats {
    /// Files encountered, before any filtering
    pub files_seen: usize,
    pub files_included: usize,
    pub files_skipped_extension: usize,
    pub files_skipped_glob: usize,
    /// Included files whose content is an error placeholder
    pub read_errors: usize,
    /// Entries the walker itself could not visit (permissions, symlink loops)
    pub walk_errors: usize,
    pub bytes_read: u64,
}

/// Result of a collection pass
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub files: FileMap,
    pub stats: CollectStats,
}

/// Collect the text of every non-excluded file under `root`.
///
/// Unreadable files are kept with an `Error reading file ...` placeholder
/// and unvisitable entries are logged and skipped, so only an invalid root
/// or an invalid glob fails the call.
pub fn collect_files(root: &Path, options: &CollectOptions) -> Result<Collection, CollectError> {
    if !root.exists() {
        return Err(CollectError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(CollectError::NotADirectory(root.to_path_buf()));
    }

    let exclude_globs = build_globset(&options.exclude_globs)?;

    let mut walker = WalkDir::new(root).follow_links(options.follow_symlinks).sort_by_file_name();
    if let Some(depth) = options.max_depth {
        walker = walker.max_depth(depth);
    }

    let mut collection = Collection::default();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("Skipping unreadable entry: {}", err);
                collection.stats.walk_errors += 1;
                continue;
            }
        };

        if !is_collectable(&entry) {
            continue;
        }
        collection.stats.files_seen += 1;

        let file_name = entry.file_name().to_string_lossy();
        if options.is_excluded_name(&file_name) {
            collection.stats.files_skipped_extension += 1;
            continue;
        }

        let relative = match entry.path().strip_prefix(root) {
            Ok(relative) => normalize_path(relative),
            Err(_) => continue,
        };
        if exclude_globs.as_ref().is_some_and(|set| set.is_match(&relative)) {
            collection.stats.files_skipped_glob += 1;
            continue;
        }

        let content = match fs::read_to_string(entry.path()) {
            Ok(content) => {
                collection.stats.bytes_read += content.len() as u64;
                content
            }
            Err(err) => {
                tracing::debug!("Failed to read {}: {}", relative, err);
                collection.stats.read_errors += 1;
                format!("Error reading file {}: {}", file_name, err)
            }
        };

        collection.stats.files_included += 1;
        collection.files.insert(relative, content);
    }

    tracing::debug!(
        "Collected {} of {} files from {} ({} skipped by extension, {} by glob, {} read errors)",
        collection.stats.files_included,
        collection.stats.files_seen,
        root.display(),
        collection.stats.files_skipped_extension,
        collection.stats.files_skipped_glob,
        collection.stats.read_errors,
    );

    Ok(collection)
}

/// Regular files and symlinks that do not resolve to a directory.
///
/// Dangling symlinks count as files so they surface as read errors.
fn is_collectable(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }
    if file_type.is_symlink() {
        return !entry.path().is_dir();
    }
    false
}

fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, CollectError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| CollectError::InvalidGlob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }

    builder.build().map(Some).map_err(|source| CollectError::InvalidGlob {
        pattern: patterns.join(","),
        source,
    })
}
