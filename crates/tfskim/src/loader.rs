//! File loading and directory walking.
//!
//! The [Loader] accumulates extracted configuration file by file. Fatal
//! errors abort the current call but leave everything merged so far in
//! place; the caller keeps the loader and decides whether partial output is
//! still useful.

use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::extract::{extract_body, ModuleSourceError};
use std::path::{Path, PathBuf};

/// Extension of the files the loader reads. Everything else is skipped.
const CONFIG_EXTENSION: &str = "tf";

/// Directory the tooling uses for provider and state caches. Paths with this
/// component never contribute configuration, even when passed explicitly.
const TOOL_STATE_DIR: &str = ".terraform";

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("unable to read {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unable to parse {}", path.display())]
    Parse {
        path: PathBuf,
        source: hcl_edit::parser::Error,
    },
    #[error("unable to walk {}", path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("invalid module in {}", path.display())]
    Module {
        path: PathBuf,
        source: ModuleSourceError,
    },
}

/// Accumulates extracted configuration across files and directories.
#[derive(Debug, Default)]
pub struct Loader {
    config: Config,
    diagnostics: Diagnostics,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recursively loads every configuration file under `path`.
    ///
    /// Traversal is depth-first with entries sorted by file name, so
    /// discovery order is stable across platforms. Tool-state directories
    /// are pruned without descending into them.
    pub fn load_directory(&mut self, path: &Path) -> Result<(), LoadError> {
        tracing::debug!(path = %path.display(), "walking directory");

        let walk = walkdir::WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != TOOL_STATE_DIR);

        for entry in walk {
            let entry = entry.map_err(|source| LoadError::Walk {
                path: path.to_path_buf(),
                source,
            })?;

            if entry.file_type().is_dir() {
                continue;
            }

            self.load_file(entry.path())?;
        }

        Ok(())
    }

    /// Loads one configuration file.
    ///
    /// Paths with the wrong extension, paths under a tool-state directory
    /// and paths that do not exist contribute nothing; all three are fine to
    /// pass. Read failures, parse failures and module source mismatches
    /// abort with an error naming the file.
    pub fn load_file(&mut self, path: &Path) -> Result<(), LoadError> {
        if !has_config_extension(path) || is_tool_state(path) {
            tracing::trace!(path = %path.display(), "skipping file");
            return Ok(());
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "file does not exist");
                return Ok(());
            }
            Err(source) => {
                return Err(LoadError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        tracing::info!(path = %path.display(), "loading file");

        let body = hcl_edit::parser::parse_body(&contents).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let partial = extract_body(&body, &mut self.diagnostics).map_err(|source| LoadError::Module {
            path: path.to_path_buf(),
            source,
        })?;

        self.config.merge(partial);
        Ok(())
    }

    /// Everything extracted so far.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Warnings recorded so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn finish(self) -> (Config, Diagnostics) {
        (self.config, self.diagnostics)
    }
}

/// Parses every configuration file under each of `directories`, then each
/// explicit path in `files`, and returns the combined model.
pub fn parse(directories: &[PathBuf], files: &[PathBuf]) -> Result<Config, LoadError> {
    let mut loader = Loader::new();

    for directory in directories {
        loader.load_directory(directory)?;
    }

    for file in files {
        loader.load_file(file)?;
    }

    let (config, _) = loader.finish();
    Ok(config)
}

fn has_config_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension == CONFIG_EXTENSION)
}

fn is_tool_state(path: &Path) -> bool {
    path.components()
        .any(|component| component.as_os_str() == TOOL_STATE_DIR)
}
