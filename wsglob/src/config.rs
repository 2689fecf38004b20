use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::GlobResult;

/// Configuration for wsglob, layered from YAML files.
///
/// # Configuration Locations
///
/// Files are merged in this order, later ones overriding earlier ones:
/// 1. Global `$HOME/.config/wsglob/config.yaml`
/// 2. Local `.wsglob.yaml` in the current directory
/// 3. Custom config file specified via `--config`
///
/// # Configuration Format
///
/// ```yaml
/// # Absolute workspace folders, in order
/// folders:
///   - "/home/me/app"
///   - "/home/me/shared"
///
/// # Or read them from an editor workspace file
/// workspace_file: "team.code-workspace"
///
/// # Default include/exclude patterns (comma separated, like the search panel)
/// include: "src/**, app/test"
/// exclude: "node_modules, dist"
///
/// # Walk hidden files and ignore .gitignore rules
/// hidden: false
/// git_ignore: true
///
/// # Thread count (default: CPU cores)
/// thread_count: 4
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
///
/// Command-line arguments take precedence over file values; see
/// [`WsglobConfig::merge_with_cli`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WsglobConfig {
    /// Absolute workspace folders
    #[serde(default)]
    pub folders: Vec<String>,

    /// A `.code-workspace` file to read folders from when `folders` is empty
    #[serde(default)]
    pub workspace_file: Option<PathBuf>,

    /// Default include patterns
    #[serde(default)]
    pub include: Option<String>,

    /// Default exclude patterns
    #[serde(default)]
    pub exclude: Option<String>,

    /// Whether to walk hidden files and directories
    #[serde(default)]
    pub hidden: bool,

    /// Whether .gitignore and friends are honored while walking
    #[serde(default = "default_git_ignore")]
    pub git_ignore: bool,

    /// Number of threads used to filter walked files (default: CPU cores)
    #[serde(default)]
    pub thread_count: Option<NonZeroUsize>,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_git_ignore() -> bool {
    true
}

pub fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

pub fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for WsglobConfig {
    fn default() -> Self {
        Self {
            folders: Vec::new(),
            workspace_file: None,
            include: None,
            exclude: None,
            hidden: false,
            git_ignore: default_git_ignore(),
            thread_count: None,
            log_level: None,
        }
    }
}

impl WsglobConfig {
    /// Thread count to use, falling back to the number of CPU cores
    pub fn threads(&self) -> NonZeroUsize {
        self.thread_count.unwrap_or_else(default_thread_count)
    }

    /// Log level to use, falling back to `warn`
    pub fn log_level(&self) -> String {
        self.log_level.clone().unwrap_or_else(default_log_level)
    }

    /// Loads configuration from the default locations
    pub fn load() -> GlobResult<Self> {
        Self::load_from(None)
    }

    /// Loads configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&Path>) -> GlobResult<Self> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("wsglob/config.yaml")),
            // Local config
            Some(PathBuf::from(".wsglob.yaml")),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // An explicit file must exist
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli_config: WsglobConfig) -> Self {
        if !cli_config.folders.is_empty() {
            self.folders = cli_config.folders;
            self.workspace_file = None;
        } else if cli_config.workspace_file.is_some() {
            self.folders.clear();
            self.workspace_file = cli_config.workspace_file;
        }
        if cli_config.include.is_some() {
            self.include = cli_config.include;
        }
        if cli_config.exclude.is_some() {
            self.exclude = cli_config.exclude;
        }
        if cli_config.hidden {
            self.hidden = true;
        }
        if !cli_config.git_ignore {
            self.git_ignore = false;
        }
        if cli_config.thread_count.is_some() {
            self.thread_count = cli_config.thread_count;
        }
        if cli_config.log_level.is_some() {
            self.log_level = cli_config.log_level;
        }
        self
    }
}
