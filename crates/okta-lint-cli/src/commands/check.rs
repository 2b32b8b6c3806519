//! Check command implementation.

use anyhow::{bail, Context, Result};
use okta_lint_core::{Analyzer, HclRunner};
use okta_lint_rules::RuleSet;
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    only: Option<&str>,
    vars: &[String],
    source: &ConfigSource,
) -> Result<()> {
    let config = super::load_config(source)?;

    let mut runner = HclRunner::load(path, &config)
        .with_context(|| format!("Failed to load module: {}", path.display()))?;
    for var in vars {
        let (name, value) = parse_var(var)?;
        runner = runner.with_variable(name, value);
    }

    let mut ruleset = RuleSet::okta(&config);
    if let Some(filter) = only {
        let names: Vec<&str> = filter
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        for name in ruleset.retain_named(&names) {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    let analyzer = Analyzer::builder()
        .rules(ruleset.into_rules())
        .config(config)
        .build();

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let result = analyzer.analyze(&mut runner).context("Analysis failed")?;

    super::output::print(&result, format, &runner)?;

    // Exit with error code if there are errors
    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Splits a `name=value` variable assignment.
fn parse_var(var: &str) -> Result<(&str, &str)> {
    match var.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => bail!("Invalid variable `{var}`: expected NAME=VALUE"),
    }
}
