//! Configuration system for the analyzer
//!
//! Reads configuration from:
//! - `.codecatcherrc.yaml` / `.codecatcherrc.json` (project-level)
//! - `~/.codecatcherrc.yaml` (user-level)

use crate::rule::RuleCategory;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Run the markup and stylesheet analyzers concurrently
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,

    /// Color mode
    pub color: ColorMode,

    /// Pretty-print JSON output
    pub pretty: bool,

    /// Verbose output
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Color mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Rule configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Disabled rules
    pub disabled: Vec<String>,

    /// Enabled rules (empty = all)
    pub enabled: Vec<String>,

    /// Select rules by prefix (e.g., "html-" selects all markup rules)
    pub extend: Vec<String>,

    /// Ignore rules by prefix (e.g., "css-" ignores all stylesheet rules)
    pub ignore: Vec<String>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extend from other configuration files or presets
    pub extends: Vec<String>,

    /// Engine settings
    pub engine: EngineConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Rule configuration
    pub rules: RulesConfig,

    /// Rule categories to enable (empty = all)
    pub categories: Vec<RuleCategory>,
}

/// Settings given on the command line, applied over the loaded file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub format: Option<OutputFormat>,
    pub pretty: bool,
    pub verbose: bool,
    pub no_color: bool,
    pub sequential: bool,
    /// Rule ids to disable, added to the file's list
    pub disable: Vec<String>,
    /// Rule ids to run exclusively, replacing the file's list
    pub select: Option<Vec<String>>,
    pub extend: Vec<String>,
    pub ignore: Vec<String>,
}

/// File names searched by [`Config::load_default`], in priority order
const CONFIG_NAMES: [&str; 6] = [
    ".codecatcherrc.yaml",
    ".codecatcherrc.yml",
    ".codecatcherrc.json",
    "codecatcher.yaml",
    "codecatcher.yml",
    "codecatcher.json",
];

/// Deepest chain of `extends` followed before giving up
const MAX_EXTENDS_DEPTH: usize = 10;

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a preset configuration by name
    pub fn preset(name: &str) -> Option<Self> {
        let categories = match name {
            "recommended" => Vec::new(),
            "accessibility" => vec![RuleCategory::Accessibility],
            "minimal" => vec![RuleCategory::Correctness],
            _ => return None,
        };
        Some(Self {
            categories,
            ..Self::default()
        })
    }

    /// Load configuration from a file, resolving its `extends` chain
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_chain(path, 0)
    }

    /// Load the first configuration file found in the working directory,
    /// then in the home directory. Defaults apply when neither has one.
    pub fn load_default() -> Result<Self, ConfigError> {
        let home = dirs::home_dir();
        let found = [Some(PathBuf::new()), home]
            .into_iter()
            .flatten()
            .flat_map(|dir| CONFIG_NAMES.iter().map(move |name| dir.join(name)))
            .find(|path| path.is_file());

        match found {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    fn load_chain(path: &Path, depth: usize) -> Result<Self, ConfigError> {
        if depth >= MAX_EXTENDS_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "extends chain deeper than {} files at {}",
                MAX_EXTENDS_DEPTH,
                path.display()
            )));
        }

        let mut own = Self::parse_file(path)?;
        log::debug!("loaded configuration from {}", path.display());

        let parents = std::mem::take(&mut own.extends);
        if parents.is_empty() {
            return Ok(own);
        }

        let base_dir = path.parent().unwrap_or(Path::new("."));
        let mut resolved = Self::default();
        for parent in &parents {
            let layer = match Self::preset(parent) {
                Some(preset) => preset,
                None => Self::load_chain(&base_dir.join(parent), depth + 1)?,
            };
            resolved.merge(layer);
        }
        resolved.merge(own);
        Ok(resolved)
    }

    /// Deserialize one file, picking the format from its extension
    fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Ok(serde_yaml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            other => Err(ConfigError::Invalid(format!(
                "unsupported config file extension '{}' for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    /// Layer `other` over this configuration. List settings accumulate,
    /// and a non-default scalar in `other` wins.
    pub fn merge(&mut self, other: Self) {
        let Self {
            extends: _,
            engine,
            output,
            rules,
            categories,
        } = other;

        self.engine = engine;

        let defaults = OutputConfig::default();
        if output.format != defaults.format {
            self.output.format = output.format;
        }
        if output.color != defaults.color {
            self.output.color = output.color;
        }
        self.output.pretty |= output.pretty;
        self.output.verbose |= output.verbose;

        self.rules.disabled.extend(rules.disabled);
        self.rules.extend.extend(rules.extend);
        self.rules.ignore.extend(rules.ignore);
        if !rules.enabled.is_empty() {
            self.rules.enabled = rules.enabled;
        }
        if !categories.is_empty() {
            self.categories = categories;
        }
    }

    /// Apply command-line settings, which take precedence over every file
    pub fn apply_cli(&mut self, cli: CliOverrides) {
        if let Some(format) = cli.format {
            self.output.format = format;
        }
        self.output.pretty |= cli.pretty;
        self.output.verbose |= cli.verbose;
        if cli.no_color {
            self.output.color = ColorMode::Never;
        }
        if cli.sequential {
            self.engine.parallel = false;
        }

        self.rules.disabled.extend(cli.disable);
        if let Some(select) = cli.select {
            self.rules.enabled = select;
        }
        self.rules.extend.extend(cli.extend);
        self.rules.ignore.extend(cli.ignore);
    }

    /// Check if a rule is enabled
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        let rules = &self.rules;
        if rules.disabled.iter().any(|r| r == rule_id) || any_prefix(&rules.ignore, rule_id) {
            return false;
        }
        if !rules.enabled.is_empty() {
            return rules.enabled.iter().any(|r| r == rule_id);
        }
        rules.extend.is_empty() || any_prefix(&rules.extend, rule_id)
    }

    /// Check if a rule category is enabled
    pub fn is_category_enabled(&self, category: RuleCategory) -> bool {
        self.categories.is_empty() || self.categories.contains(&category)
    }
}

/// ASCII case-insensitive prefix test against a list of prefixes
fn any_prefix(prefixes: &[String], rule_id: &str) -> bool {
    prefixes.iter().any(|prefix| {
        rule_id
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}
