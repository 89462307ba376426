use serde::Deserialize;
use thiserror::Error;

/// How a found match is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    /// Print the byte offset of the closing bracket, or `-1` (default).
    #[default]
    Index,
    /// Print the bracketed text.
    Excerpt,
    /// Print `line:column` of the closing bracket.
    Location,
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConfigError {
    /// Description of the validation error.
    pub message: String,
}

/// Largest accepted value for `max_input_bytes`.
const MAX_INPUT_LIMIT: usize = 1 << 30;

/// Matching configuration options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How matches are reported.
    pub output: OutputStyle,
    /// Inputs longer than this are rejected (1 byte to 1 GiB, default: 16 MiB).
    pub max_input_bytes: usize,
}

impl Config {
    /// Parse and validate a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value is out of range.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError {
            message: e.message().to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is out of acceptable range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_input_bytes == 0 || self.max_input_bytes > MAX_INPUT_LIMIT {
            return Err(ConfigError {
                message: format!(
                    "max_input_bytes must be between 1 and {MAX_INPUT_LIMIT}, got {}",
                    self.max_input_bytes
                ),
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputStyle::default(),
            max_input_bytes: 16 * 1024 * 1024,
        }
    }
}
