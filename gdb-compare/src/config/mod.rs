//! Configuration for schema comparisons
//!
//! Settings come from an optional TOML file and are then overridden by
//! command-line flags. The default file lives at
//! `~/.config/gdb-compare/config.toml`:
//!
//! ```toml
//! [compare]
//! ignore = ["Field Alias", "Has M"]
//! ignore_non_text_field_length = true
//!
//! [report]
//! output_dir = "/tmp/schema-reports"
//! open_after_export = false
//! format = "xlsx"
//! ```

pub mod ignore;

pub use ignore::{IgnoreOption, IgnoreOptions};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Options that change what the comparison looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareOptions {
    pub ignore: IgnoreOptions,
    /// Drop the Length property of every non-text field before comparing
    pub ignore_non_text_field_length: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            ignore: IgnoreOptions::default(),
            ignore_non_text_field_length: true,
        }
    }
}

impl CompareOptions {
    pub fn ignores(&self, option: IgnoreOption) -> bool {
        self.ignore.contains(option)
    }
}

/// Output format for the difference report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Xlsx,
    Csv,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

/// Contents of the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub compare: CompareSection,
    #[serde(default)]
    pub report: ReportSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareSection {
    /// Ignore option names, same spelling as `--ignore`
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default = "default_true")]
    pub ignore_non_text_field_length: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSection {
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub open_after_export: bool,
    #[serde(default)]
    pub format: ReportFormat,
}

fn default_true() -> bool {
    true
}

impl Default for CompareSection {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            ignore_non_text_field_length: true,
        }
    }
}

impl Config {
    /// Load the config from `path`, or from the default location when `None`.
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_config_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if required {
                anyhow::bail!("Config file does not exist: {}", path.display());
            }
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Build comparison options from the file settings plus extra ignore names
    /// given on the command line
    pub fn compare_options(&self, extra_ignore: Option<&str>) -> CompareOptions {
        let mut ignore = IgnoreOptions::from_names(self.compare.ignore.iter().map(String::as_str));
        if let Some(list) = extra_ignore {
            ignore.merge(IgnoreOptions::parse(list));
        }

        CompareOptions {
            ignore,
            ignore_non_text_field_length: self.compare.ignore_non_text_field_length,
        }
    }
}

/// `~/.config/gdb-compare/config.toml` (platform equivalent)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gdb-compare").join("config.toml"))
}
