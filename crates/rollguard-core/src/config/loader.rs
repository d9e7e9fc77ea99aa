//! Configuration file loading and parsing

use crate::canary::CanaryEvaluator;
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use crate::types::RollguardConfigFile;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Configuration file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["rollguard.yaml", "rollguard.yml"];

/// Loaded and validated rollguard configuration
#[derive(Debug, Clone)]
pub struct RollguardConfig {
    /// The parsed configuration
    pub config: RollguardConfigFile,

    /// Path to the configuration file, `None` for built-in defaults
    pub config_path: Option<Utf8PathBuf>,
}

impl RollguardConfig {
    /// Load configuration from the specified path or search for it
    ///
    /// Both the retry policy and the canary thresholds are validated, so a
    /// loaded config always builds a working executor and evaluator.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let (config_path, content) = match path {
            Some(p) => (p.to_owned(), read_config(p)?),
            None => Self::find_config_from(&current_dir()?)?
                .ok_or_else(|| {
                    Error::config_not_found(
                        "rollguard.yaml (searched current and parent directories)",
                    )
                })?,
        };

        Self::parse(&content, Some(config_path))
    }

    /// Like `load`, but falls back to defaults when no file is found
    ///
    /// An explicit path that does not exist is still an error.
    pub fn load_or_default(path: Option<&Utf8Path>) -> Result<Self> {
        if path.is_some() {
            return Self::load(path);
        }
        match Self::find_config_from(&current_dir()?)? {
            Some((config_path, content)) => Self::parse(&content, Some(config_path)),
            None => {
                tracing::debug!("no rollguard.yaml found, using defaults");
                Ok(Self::defaults())
            }
        }
    }

    /// Built-in defaults, not backed by a file
    pub fn defaults() -> Self {
        Self {
            config: RollguardConfigFile::default(),
            config_path: None,
        }
    }

    /// Parse and validate YAML content
    pub fn parse(content: &str, config_path: Option<Utf8PathBuf>) -> Result<Self> {
        let config: RollguardConfigFile = serde_yaml_ng::from_str(content)?;
        let loaded = Self {
            config,
            config_path,
        };
        loaded.retry_policy()?;
        loaded.evaluator()?;
        Ok(loaded)
    }

    /// Search `start` and its parents for a configuration file
    fn find_config_from(start: &Utf8Path) -> Result<Option<(Utf8PathBuf, String)>> {
        let mut current = Some(start);

        while let Some(dir) = current {
            for name in CONFIG_FILE_NAMES {
                let path = dir.join(name);
                if path.exists() {
                    let content = fs::read_to_string(&path)?;
                    return Ok(Some((path, content)));
                }
            }
            current = dir.parent();
        }

        Ok(None)
    }

    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        self.config.retry.to_policy()
    }

    pub fn evaluator(&self) -> Result<CanaryEvaluator> {
        CanaryEvaluator::from_settings(&self.config.canary)
    }

    /// Human-readable origin of this configuration
    pub fn source_label(&self) -> &str {
        self.config_path
            .as_ref()
            .map(|p| p.as_str())
            .unwrap_or("built-in defaults")
    }
}

fn read_config(path: &Utf8Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::config_not_found(path.as_str())
        } else {
            Error::Io(e)
        }
    })
}

fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::try_from(cwd)
        .map_err(|_| Error::invalid_config("Current directory path is not valid UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn utf8_dir(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = utf8_dir(&dir).join("rollguard.yaml");
        fs::write(
            &path,
            "retry:\n  max-attempts: 2\n  base-delay-ms: 50\ncanary:\n  p95-threshold-ms: 100\n",
        )
        .unwrap();

        let loaded = RollguardConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(loaded.source_label(), path.as_str());

        let policy = loaded.retry_policy().unwrap();
        assert_eq!(policy.max_attempts(), 2);
        assert_eq!(policy.base_delay(), Duration::from_millis(50));
        assert_eq!(loaded.evaluator().unwrap().p95_threshold_ms(), 100.0);
    }

    #[test]
    fn test_missing_explicit_path() {
        let err = RollguardConfig::load(Some(Utf8Path::new("/nonexistent/rollguard.yaml")))
            .unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));

        let err = RollguardConfig::load_or_default(Some(Utf8Path::new(
            "/nonexistent/rollguard.yaml",
        )))
        .unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        let err = RollguardConfig::parse("retry:\n  max-attempts: 0\n", None).unwrap_err();
        assert!(err.is_invalid_config());

        let err = RollguardConfig::parse("canary:\n  p95-threshold-ms: -1\n", None).unwrap_err();
        assert!(err.is_invalid_config());

        let err =
            RollguardConfig::parse("canary:\n  error-rate-threshold: 2.0\n", None).unwrap_err();
        assert!(err.is_invalid_config());
    }

    #[test]
    fn test_parse_rejects_malformed_yaml() {
        let err = RollguardConfig::parse("retry: [unterminated", None).unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_find_config_in_parent_directory() {
        let dir = TempDir::new().unwrap();
        let root = utf8_dir(&dir);
        fs::write(root.join("rollguard.yml"), "canary:\n  p95-threshold-ms: 42\n").unwrap();
        let nested = root.join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let (path, content) = RollguardConfig::find_config_from(&nested).unwrap().unwrap();
        assert_eq!(path, root.join("rollguard.yml"));
        assert!(content.contains("42"));
    }

    #[test]
    fn test_defaults_are_valid() {
        let defaults = RollguardConfig::defaults();
        assert_eq!(defaults.source_label(), "built-in defaults");
        assert!(defaults.retry_policy().is_ok());
        assert!(defaults.evaluator().is_ok());
    }
}
