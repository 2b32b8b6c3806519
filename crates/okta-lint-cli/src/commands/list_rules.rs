//! List rules command implementation.

use anyhow::Result;
use okta_lint_rules::RuleSet;

use crate::config_resolver::ConfigSource;

/// Runs the list-rules command.
pub fn run(source: &ConfigSource) -> Result<()> {
    let config = super::load_config(source)?;
    let ruleset = RuleSet::okta(&config);

    println!("Ruleset {} v{}\n", ruleset.name(), ruleset.version());
    println!(
        "{:<28} {:<10} {:<8} Description",
        "Name", "Severity", "Enabled"
    );
    println!("{}", "-".repeat(80));

    for rule in ruleset.into_rules() {
        let severity = config.rule_severity(rule.name()).unwrap_or(rule.severity());
        let enabled = config.is_rule_enabled(rule.name(), rule.enabled());
        println!(
            "{:<28} {:<10} {:<8} {}",
            rule.name(),
            severity.to_string(),
            enabled,
            rule.description()
        );
    }

    println!("\nUse --only to run specific rules, e.g.:");
    println!("  okta-lint check --only okta_group_name_prefix");

    Ok(())
}
