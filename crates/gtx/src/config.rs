// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for gtx
//!
//! Options come from three places, in order of precedence: command-line
//! flags, the settings file saved in the output directory by the previous
//! run, and built-in defaults. Each option is merged explicitly with
//! [`resolve`]; the effective options are saved back for the next run.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Name of the settings file kept in the output directory
pub const SETTINGS_FILE: &str = ".gtx.json";

/// Project name used when none is configured
pub const DEFAULT_PROJECT: &str = "Jimbo";

/// gtx - render the history of a git repository as a static site
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "gtx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Project title shown on every page
    #[arg(short, long)]
    pub project: Option<String>,

    /// Repository to render: a URL or an absolute local path
    #[arg(short, long, env = "GTX_REPO")]
    pub repo: Option<String>,

    /// Branch to render (repeatable, kept in the given order)
    ///
    /// Defaults to every branch of the repository.
    #[arg(short = 'b', long = "branch", value_name = "BRANCH")]
    pub branches: Vec<String>,

    /// Public clone URL shown on the home page
    #[arg(short, long)]
    pub url: Option<String>,

    /// Handlebars template replacing the built-in one
    #[arg(short, long, env = "GTX_TEMPLATE")]
    pub template: Option<PathBuf>,

    /// Maximum number of concurrent git processes
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Clear rendered commits and objects before running
    #[arg(short, long, default_value = "false")]
    pub force: bool,

    /// Quiet mode - only errors are logged
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Output directory, defaults to the current directory
    pub output: Option<PathBuf>,
}

/// Options saved between runs in [`SETTINGS_FILE`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub project: Option<String>,
    pub repo: Option<String>,
    pub branches: Vec<String>,
    pub url: Option<String>,
    pub template: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub force: bool,
    pub quiet: bool,
}

impl Settings {
    /// Read the settings saved in `output`
    ///
    /// A missing file is not an error and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed.
    pub fn load(output: &Path) -> Result<Option<Self>, ConfigError> {
        let path = output.join(SETTINGS_FILE);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ConfigError::SettingsRead(path, e)),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| ConfigError::SettingsParse(path, e))
    }

    /// Write these settings to `output`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::SettingsWrite` if the file cannot be written.
    pub fn save(&self, output: &Path) -> Result<(), ConfigError> {
        let path = output.join(SETTINGS_FILE);
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SettingsParse(path.clone(), e))?;
        std::fs::write(&path, json).map_err(|e| ConfigError::SettingsWrite(path, e))
    }
}

/// The effective options of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub project: String,
    pub repo: String,
    pub branches: Vec<String>,
    pub url: Option<String>,
    pub template: Option<PathBuf>,
    pub jobs: usize,
    pub force: bool,
    pub quiet: bool,
    pub verbose: bool,
    pub output: PathBuf,
}

/// The flag if given, else the saved setting, else the default
pub fn resolve<T>(flag: Option<T>, config: Option<T>, default: T) -> T {
    flag.or(config).unwrap_or(default)
}

/// Remove repeated entries, keeping the first occurrence
#[must_use]
pub fn dedupe(values: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// Default bound on concurrent git processes
#[must_use]
pub fn default_jobs() -> usize {
    std::thread::available_parallelism().map_or(4, |n| n.get() * 2)
}

/// Whether `source` names a remote rather than a local path
///
/// Accepts `scheme://...` and scp-like `user@host:path` forms.
#[must_use]
pub fn looks_like_url(source: &str) -> bool {
    if let Some((scheme, rest)) = source.split_once("://") {
        return !scheme.is_empty()
            && !rest.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    }
    match source.split_once('@') {
        Some((user, rest)) => {
            !user.is_empty()
                && rest
                    .split_once(':')
                    .is_some_and(|(host, path)| !host.is_empty() && !path.is_empty())
        }
        None => false,
    }
}

fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}

impl Cli {
    /// The output directory, made absolute against `cwd`
    #[must_use]
    pub fn output_dir(&self, cwd: &Path) -> PathBuf {
        match &self.output {
            Some(out) if out.is_absolute() => out.clone(),
            Some(out) => cwd.join(out),
            None => cwd.to_path_buf(),
        }
    }

    /// Merge these flags with `settings` into effective options
    ///
    /// Relative local repository and template paths are resolved against
    /// `cwd`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRepo` if neither source names a repository.
    pub fn merge(&self, settings: Settings, cwd: &Path) -> Result<Options, ConfigError> {
        let repo = self
            .repo
            .clone()
            .or(settings.repo)
            .ok_or(ConfigError::MissingRepo)?;
        let repo = if looks_like_url(&repo) || Path::new(&repo).is_absolute() {
            repo
        } else {
            cwd.join(&repo).display().to_string()
        };

        let branches = if self.branches.is_empty() {
            settings.branches
        } else {
            self.branches.clone()
        };

        let template = self
            .template
            .clone()
            .or(settings.template)
            .map(|t| if t.is_absolute() { t } else { cwd.join(t) });

        Ok(Options {
            project: resolve(
                self.project.clone(),
                settings.project,
                DEFAULT_PROJECT.to_string(),
            ),
            repo,
            branches: dedupe(branches),
            url: self.url.clone().or(settings.url),
            template,
            jobs: resolve(self.jobs, settings.jobs, default_jobs()),
            force: resolve(flag(self.force), flag(settings.force), false),
            quiet: resolve(flag(self.quiet), flag(settings.quiet), false),
            verbose: self.verbose,
            output: self.output_dir(cwd),
        })
    }
}

impl Options {
    /// Validate the effective options
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The repository is a local path without a `.git` entry
    /// - The repository is neither a local path nor a URL
    /// - `jobs` is zero
    /// - The template file does not exist
    pub fn validate(&self) -> Result<(), ConfigError> {
        if Path::new(&self.repo).is_absolute() {
            if !Path::new(&self.repo).join(".git").exists() {
                return Err(ConfigError::NotARepository(PathBuf::from(&self.repo)));
            }
        } else if !looks_like_url(&self.repo) {
            return Err(ConfigError::InvalidSource(self.repo.clone()));
        }

        if self.jobs == 0 {
            return Err(ConfigError::InvalidJobs);
        }

        if let Some(ref template) = self.template
            && !template.is_file()
        {
            return Err(ConfigError::TemplateNotFound(template.clone()));
        }

        Ok(())
    }

    /// The settings to save for the next run
    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            project: Some(self.project.clone()),
            repo: Some(self.repo.clone()),
            branches: self.branches.clone(),
            url: self.url.clone(),
            template: self.template.clone(),
            jobs: Some(self.jobs),
            force: self.force,
            quiet: self.quiet,
        }
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::ERROR
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No repository given on the command line or in the settings file
    #[error("No repository given: pass --repo or save one in {SETTINGS_FILE}")]
    MissingRepo,

    /// Local repository path without a `.git` entry
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Repository is neither a local path nor a URL
    #[error("Repository must be an absolute path or a URL: {0}")]
    InvalidSource(String),

    /// `--jobs 0`
    #[error("--jobs must be at least 1")]
    InvalidJobs,

    /// Template file not found
    #[error("Template file not found: {0}")]
    TemplateNotFound(PathBuf),

    /// Settings file could not be read
    #[error("Failed to read settings {0}: {1}")]
    SettingsRead(PathBuf, std::io::Error),

    /// Settings file is not valid JSON
    #[error("Invalid settings {0}: {1}")]
    SettingsParse(PathBuf, serde_json::Error),

    /// Settings file could not be written
    #[error("Failed to save settings {0}: {1}")]
    SettingsWrite(PathBuf, std::io::Error),
}
