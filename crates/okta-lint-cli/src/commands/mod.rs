//! Subcommand implementations.

pub mod check;
pub mod init;
pub mod list_rules;
pub mod output;

use anyhow::{Context, Result};
use okta_lint_core::Config;

use crate::config_resolver::ConfigSource;

fn load_config(source: &ConfigSource) -> Result<Config> {
    source.load().with_context(|| match source.path() {
        Some(path) => format!("Failed to load config: {}", path.display()),
        None => "Failed to load config".to_string(),
    })
}
