//! Project configuration loaded from `.cinotifier.toml`.
//!
//! Every section is optional. A missing file yields the defaults: the
//! conventional-commit types most projects publish, a rendezvous budget of
//! 20 polls one second apart, and the Tizen build/package steps.

use crate::changelog::ChangelogConfig;
use crate::log_debug;
use crate::packaging::PackagingStep;
use crate::rendezvous::PollPolicy;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Project configuration filename, looked up in the repository root
pub const PROJECT_CONFIG_FILENAME: &str = ".cinotifier.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub changelog: ChangelogConfig,
    #[serde(default)]
    pub rendezvous: RendezvousConfig,
    #[serde(default)]
    pub packaging: PackagingConfig,
}

/// Share-lookup polling settings
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct RendezvousConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_max_attempts() -> u32 {
    20
}

fn default_interval_ms() -> u64 {
    1000
}

impl Default for RendezvousConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl RendezvousConfig {
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(self.max_attempts, Duration::from_millis(self.interval_ms))
    }
}

/// Commands run by the `package` subcommand
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct PackagingConfig {
    #[serde(default = "default_packaging_steps")]
    pub steps: Vec<PackagingStep>,
}

fn default_packaging_steps() -> Vec<PackagingStep> {
    vec![
        PackagingStep::new("tizen", &["build-web", "--", "./dist"]),
        PackagingStep::new(
            "tizen",
            &[
                "package",
                "-s",
                "game",
                "-t",
                "wgt",
                "-o",
                "out",
                "--",
                "./dist/.buildResult",
            ],
        ),
    ]
}

impl Default for PackagingConfig {
    fn default() -> Self {
        Self {
            steps: default_packaging_steps(),
        }
    }
}

impl Config {
    /// Load `.cinotifier.toml` from `repo_root`, or the defaults if it is absent
    pub fn load(repo_root: &Path) -> Result<Self, ConfigError> {
        let path = repo_root.join(PROJECT_CONFIG_FILENAME);
        if path.exists() {
            Self::load_from(&path)
        } else {
            log_debug!("No {} found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load an explicit config file; unlike [`Config::load`] a missing file is an error
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        log_debug!("Configuration loaded from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from(PROJECT_CONFIG_FILENAME),
            source,
        })?;
        config.changelog.normalize();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.rendezvous.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "rendezvous.max_attempts must be at least 1".to_string(),
            ));
        }
        if let Some(entry) = self.changelog.types.iter().find(|t| t.commit_type.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "changelog type for section '{}' has an empty name",
                entry.section
            )));
        }
        if self.packaging.steps.iter().any(|s| s.program.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "packaging steps need a program".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn defaults_match_the_rendezvous_contract() {
        let config = Config::default();
        assert_eq!(config.rendezvous.max_attempts, 20);
        assert_eq!(config.rendezvous.interval_ms, 1000);
        let policy = config.rendezvous.poll_policy();
        assert_eq!(policy.max_attempts(), 20);
        assert_eq!(policy.interval(), Duration::from_secs(1));
        assert_eq!(config.packaging.steps.len(), 2);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            [rendezvous]
            interval_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.rendezvous.interval_ms, 250);
        assert_eq!(config.rendezvous.max_attempts, 20);
        assert!(config.changelog.section_for("feat").is_some());
    }

    #[test]
    fn changelog_types_are_lowercased() {
        let config = Config::from_toml(
            r#"
            [[changelog.types]]
            type = "FEAT"
            section = "New Stuff"
            "#,
        )
        .unwrap();
        assert_eq!(config.changelog.types.len(), 1);
        assert_eq!(config.changelog.section_for("feat"), Some("New Stuff"));
        assert_eq!(config.changelog.section_for("fix"), None);
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let err = Config::from_toml("[rendezvous]\nmax_attempts = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::from_toml("[rendezvous\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_reads_project_file() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILENAME),
            "[[packaging.steps]]\nprogram = \"make\"\nargs = [\"dist\"]\n",
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.packaging.steps.len(), 1);
        assert_eq!(config.packaging.steps[0].program, "make");
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.rendezvous.max_attempts, 20);
    }
}
