use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::context::BalancePolicy;
use crate::core::lexer::Language;

pub const CONFIG_FILE_NAME: &str = ".modsplitrc.json";

/// Specifiers matching this are followed into further files.
pub const DEFAULT_EXTRACTABLE: &str = r"(?i)\.m?js$";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// File processed when no files are given on the command line.
    #[serde(default = "default_entry")]
    pub entry: String,
    #[serde(default = "default_extractable")]
    pub extractable: String,
    /// Globs over resolved paths that are never enqueued.
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_follow_imports")]
    pub follow_imports: bool,
    #[serde(default)]
    pub on_balance_mismatch: BalancePolicy,
    /// Scanner override; chosen per file extension when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

fn default_entry() -> String {
    "lib/util.js".to_string()
}

fn default_extractable() -> String {
    DEFAULT_EXTRACTABLE.to_string()
}

fn default_follow_imports() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entry: default_entry(),
            extractable: default_extractable(),
            ignores: Vec::new(),
            follow_imports: default_follow_imports(),
            on_balance_mismatch: BalancePolicy::default(),
            language: None,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if `extractable` is not a valid regular expression or
    /// any pattern in `ignores` is not a valid glob.
    pub fn validate(&self) -> Result<()> {
        self.extractable_regex()?;
        self.ignore_patterns()?;
        Ok(())
    }

    pub fn extractable_regex(&self) -> Result<Regex> {
        Regex::new(&self.extractable).with_context(|| {
            format!(
                "Invalid regular expression in 'extractable': \"{}\"",
                self.extractable
            )
        })
    }

    pub fn ignore_patterns(&self) -> Result<Vec<Pattern>> {
        self.ignores
            .iter()
            .map(|pattern| {
                Pattern::new(pattern)
                    .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))
            })
            .collect()
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
