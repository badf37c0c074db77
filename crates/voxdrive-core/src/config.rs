use crate::error::ConfigError;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub asr: AsrConfig,

    #[serde(default)]
    pub command: CommandConfig,

    #[serde(default)]
    pub archive: Option<ArchiveConfig>,

    #[serde(default)]
    pub sink: Vec<SinkConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Falls back to the input device's default rate when unset.
    #[serde(default)]
    pub sample_rate: Option<u32>,

    #[serde(default = "default_block_size")]
    pub block_size: u32,

    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            sample_rate: None,
            block_size: default_block_size(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    /// `"default"`, an exact device name, or a numeric device index.
    #[serde(default = "default_device_name")]
    pub device_name: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AsrConfig {
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Engine-specific settings, handed to the engine untouched.
    #[serde(flatten)]
    pub settings: toml::Table,
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            settings: toml::Table::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CommandConfig {
    /// Rewrites applied after the built-in homophone corrections.
    #[serde(default)]
    pub extra_rewrites: Vec<RewriteConfig>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RewriteConfig {
    pub pattern: String,

    #[serde(default)]
    pub replacement: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArchiveConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SinkConfig {
    pub kind: String,

    #[serde(flatten)]
    pub extra: toml::Value,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_block_size() -> u32 {
    8000
}

fn default_queue_capacity() -> usize {
    64
}

fn default_device_name() -> String {
    "default".to_string()
}

fn default_engine() -> String {
    "vosk".to_string()
}

/// Interpolate `${VAR}` patterns with environment variable values.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::Invalid(e.to_string()))?;
    let mut result = input.to_string();
    let mut errors = Vec::new();

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(val) => {
                result = result.replace(&cap[0], &val);
            }
            Err(_) => {
                errors.push(var_name.to_string());
            }
        }
    }

    if let Some(first_missing) = errors.into_iter().next() {
        return Err(ConfigError::EnvVarNotFound(first_missing));
    }

    Ok(result)
}

impl AppConfig {
    /// Load configuration from a TOML file, with environment variable interpolation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let interpolated = interpolate_env_vars(s)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.sample_rate == Some(0) {
            return Err(ConfigError::Invalid("sample_rate must be positive".to_string()));
        }
        if self.general.block_size == 0 {
            return Err(ConfigError::Invalid("block_size must be positive".to_string()));
        }
        if self.general.queue_capacity == 0 {
            return Err(ConfigError::Invalid("queue_capacity must be positive".to_string()));
        }
        if let Some(rule) = self.command.extra_rewrites.iter().find(|r| r.pattern.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "rewrite pattern must not be empty (replacement {:?})",
                rule.replacement
            )));
        }
        Ok(())
    }
}
