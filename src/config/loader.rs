// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Config file loading and validation.

use std::path::Path;

use tracing::debug;

use super::ServerConfig;
use crate::error::ConfigError;

/// Load and validate a single server config from a JSON file.
pub fn load_server_config(path: impl AsRef<Path>) -> Result<ServerConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::NotFound(format!("{}: {}", path.display(), e)))?;

    let config: ServerConfig = serde_json::from_str(&content)?;
    config.validate()?;

    debug!(name = %config.name, kind = %config.kind, "config loaded");
    Ok(config)
}

/// Load and validate several server configs, preserving input order.
///
/// Fails on the first bad file: a broken config is a caller mistake, not a
/// per-server runtime failure.
pub fn load_server_configs(
    paths: impl IntoIterator<Item = impl AsRef<Path>>,
) -> Result<Vec<ServerConfig>, ConfigError> {
    paths.into_iter().map(load_server_config).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, name: &str, json: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(json.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "calc.json",
            r#"{"name": "calc", "type": "stdio", "command": "node", "args": ["mock.js"]}"#,
        );

        let config = load_server_config(&path).unwrap();
        assert_eq!(config.name, "calc");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_server_config("/nonexistent/config.json").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_config_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "bad.json", r#"{"name": "bad", "type": "stdio"}"#);

        let err = load_server_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_many_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_config(
            &dir,
            "a.json",
            r#"{"name": "alpha", "type": "stdio", "command": "a"}"#,
        );
        let b = write_config(
            &dir,
            "b.json",
            r#"{"name": "beta", "type": "stream", "url": "http://localhost/mcp"}"#,
        );

        let configs = load_server_configs([&a, &b]).unwrap();
        assert_eq!(configs[0].name, "alpha");
        assert_eq!(configs[1].name, "beta");
    }
}
