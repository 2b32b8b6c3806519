//! Locating and loading `okta-lint.toml`.
//!
//! The first match wins:
//!
//! 1. `--config <FILE>`
//! 2. `okta-lint.toml` or `.okta-lint.toml` in the module directory
//! 3. `config.toml` in the global directory (`$OKTA_LINT_CONFIG_DIR`, else `~/.okta-lint/`)
//! 4. built-in defaults

use okta_lint_core::{Config, ConfigError};
use std::path::{Path, PathBuf};

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found next to the module.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the config file path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Reads the configuration this source points at.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<Config, ConfigError> {
        match self.path() {
            Some(path) => {
                if matches!(self, Self::Global(_)) {
                    tracing::info!("Using global config: {}", path.display());
                }
                Config::from_file(path)
            }
            None => Ok(Config::default()),
        }
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["okta-lint.toml", ".okta-lint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration for the module in `module_dir`.
#[must_use]
pub fn resolve(module_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_with(module_dir, explicit, global_config_dir())
}

fn resolve_with(module_dir: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(candidate) = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| module_dir.join(name))
        .find(|p| p.exists())
    {
        tracing::debug!("Found project config: {}", candidate.display());
        return ConfigSource::Project(candidate);
    }

    match global_dir.map(|dir| dir.join(GLOBAL_CONFIG_NAME)) {
        Some(candidate) if candidate.exists() => {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        }
        _ => ConfigSource::Default,
    }
}

/// Returns the global config directory: `$OKTA_LINT_CONFIG_DIR`, else
/// `~/.okta-lint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("OKTA_LINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".okta-lint"))
}
