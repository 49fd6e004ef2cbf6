//! Error types for the fireworks engine

use thiserror::Error;

/// The main error type for fireworks operations
#[derive(Debug, Error)]
pub enum FireworksError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Duplicate template name: {0}")]
    DuplicateName(String),

    #[error("Launcher not found: index {index} (have {count})")]
    LauncherNotFound { index: usize, count: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

impl FireworksError {
    /// Shorthand for a range violation on a named field
    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, value: f64) -> Self {
        FireworksError::ValueOutOfRange {
            field: field.into(),
            min,
            max,
            value,
        }
    }
}

/// Result type alias for fireworks operations
pub type Result<T> = std::result::Result<T, FireworksError>;

impl From<toml::de::Error> for FireworksError {
    fn from(err: toml::de::Error) -> Self {
        FireworksError::TomlParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_error_message() {
        let err = FireworksError::out_of_range("mass", 0.0, f64::MAX, -1.0);
        let msg = err.to_string();
        assert!(msg.contains("mass"));
        assert!(msg.contains("-1"));
    }

    #[test]
    fn toml_error_converts() {
        let parsed: std::result::Result<toml::value::Table, _> = toml::from_str("a = [");
        let err: FireworksError = parsed.unwrap_err().into();
        assert!(matches!(err, FireworksError::TomlParseError(_)));
    }
}
