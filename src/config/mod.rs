//! Configuration APIs
//!
//! The [`Config`] trait provides validation, environment initialization,
//! presets and JSON file round trips for configuration types.
//!
//! ```rust
//! use tailtrie::config::{Config, DoubleArrayConfig};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DoubleArrayConfig::builder()
//!     .initial_capacity(4096)
//!     .boundary(b'#')
//!     .build()?;
//!
//! // Initialize from environment variables with TAILTRIE_ prefix
//! let from_env = DoubleArrayConfig::from_env()?;
//! # let _ = (config, from_env);
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use std::env;
use std::fmt;
use std::path::Path;

pub mod double_array;

pub use double_array::{AlphabetKind, DoubleArrayConfig, DoubleArrayConfigBuilder};

/// Default environment variable prefix
pub const ENV_PREFIX: &str = "TAILTRIE_";

/// Common configuration trait providing validation, environment initialization,
/// and preset management functionality.
pub trait Config: Clone + fmt::Debug {
    /// Validate the configuration for correctness and consistency.
    fn validate(&self) -> Result<()>;

    /// Initialize configuration from `TAILTRIE_`-prefixed environment variables.
    fn from_env() -> Result<Self>
    where
        Self: Default,
    {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Initialize configuration from environment variables with a custom prefix.
    fn from_env_with_prefix(prefix: &str) -> Result<Self>
    where
        Self: Default;

    /// Preset trading memory for fewer reallocations.
    fn performance_preset() -> Self;

    /// Preset keeping initial allocations minimal.
    fn memory_preset() -> Self;

    /// Balanced preset, the default configuration.
    fn balanced_preset() -> Self
    where
        Self: Default,
    {
        Self::default()
    }

    /// Save configuration to a JSON file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Load and validate configuration from a JSON file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

/// Configuration validation error details.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// The invalid value
    pub value: String,
    /// Description of why the value is invalid
    pub reason: String,
    /// Suggested valid values or ranges
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(field: &str, value: &str, reason: &str) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
            suggestion: None,
        }
    }

    /// Add a suggestion for valid values.
    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid configuration for field '{}': value '{}' is invalid ({})",
            self.field, self.value, self.reason
        )?;

        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". Suggested values: {}", suggestion)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Parse an environment variable, falling back to `default` when unset or unparsable.
pub fn parse_env_var<T>(var_name: &str, default: T) -> T
where
    T: std::str::FromStr + Clone,
{
    env::var(var_name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("initial_capacity", "1", "must be at least 2")
            .with_suggestion("1024");
        let display = err.to_string();
        assert!(display.contains("initial_capacity"));
        assert!(display.contains("must be at least 2"));
        assert!(display.contains("Suggested values: 1024"));
    }

    #[test]
    fn test_parse_env_var_fallback() {
        assert_eq!(parse_env_var("TAILTRIE_TEST_SURELY_UNSET_VAR", 42usize), 42);
    }

    #[test]
    fn test_parse_env_values() {
        env::set_var("TAILTRIE_TEST_PARSE_NUM", "17");
        env::set_var("TAILTRIE_TEST_PARSE_BAD", "seventeen");

        assert_eq!(parse_env_var("TAILTRIE_TEST_PARSE_NUM", 0usize), 17);
        assert_eq!(parse_env_var("TAILTRIE_TEST_PARSE_BAD", 3usize), 3);
    }
}
