// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for mcp-to-tools.
//!
//! This module provides strongly-typed errors for the configuration and
//! generation layers, using `thiserror` for ergonomic error definitions and
//! `anyhow` for propagation at the application boundary. Protocol-level
//! errors live in [`crate::mcp::error`].

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("IO error reading config: {0}")]
    IoError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::IoError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

/// Errors that can occur during code generation and output writing.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Template rendering failed: {0}")]
    RenderFailed(String),

    #[error("Output directory already contains files, use --force to overwrite: {0}")]
    OutputExists(String),

    #[error("IO error writing output: {0}")]
    IoError(String),
}

impl From<std::io::Error> for GenerateError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<minijinja::Error> for GenerateError {
    fn from(err: minijinja::Error) -> Self {
        Self::RenderFailed(err.to_string())
    }
}

/// Result type alias using anyhow for flexible error handling.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let config_err: ConfigError = io_err.into();
        assert!(matches!(config_err, ConfigError::NotFound(_)));

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let config_err: ConfigError = io_err.into();
        assert!(matches!(config_err, ConfigError::IoError(_)));
    }

    #[test]
    fn test_config_error_from_json() {
        let result: std::result::Result<serde_json::Value, _> = serde_json::from_str("not json");
        let config_err: ConfigError = result.unwrap_err().into();
        assert!(matches!(config_err, ConfigError::JsonError(_)));
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::InvalidValue {
            field: "type".to_string(),
            message: "must be 'stdio' or 'stream'".to_string(),
        };
        assert!(err.to_string().contains("type"));

        let err = GenerateError::OutputExists("./out".to_string());
        assert!(err.to_string().contains("--force"));
    }
}
