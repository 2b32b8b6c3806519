//! The Okta ruleset.

use crate::attribute_prefix::{self, AttributePrefixRule};
use okta_lint_core::{Config, RuleBox};

/// A named, versioned collection of rules.
pub struct RuleSet {
    name: &'static str,
    version: &'static str,
    rules: Vec<RuleBox>,
}

impl RuleSet {
    /// Builds the Okta ruleset, applying per-rule options from `config`.
    #[must_use]
    pub fn okta(config: &Config) -> Self {
        let mut prefix_rule = AttributePrefixRule::okta_group_name();
        if let Some(rule_config) = config.rule(attribute_prefix::NAME) {
            prefix_rule = prefix_rule.with_config(rule_config);
        }

        Self {
            name: "okta",
            version: env!("CARGO_PKG_VERSION"),
            rules: vec![Box::new(prefix_rule)],
        }
    }

    /// Ruleset name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name
    }

    /// Ruleset version.
    #[must_use]
    pub fn version(&self) -> &str {
        self.version
    }

    /// Names of the rules in this set.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Keeps only the rules whose names are in `names`.
    ///
    /// Returns the names that matched no rule.
    pub fn retain_named<'a>(&mut self, names: &[&'a str]) -> Vec<&'a str> {
        let unknown = names
            .iter()
            .copied()
            .filter(|n| !self.rules.iter().any(|r| r.name() == *n))
            .collect();
        self.rules.retain(|r| names.contains(&r.name()));
        unknown
    }

    /// Consumes the set, returning its rules.
    #[must_use]
    pub fn into_rules(self) -> Vec<RuleBox> {
        self.rules
    }
}

/// Returns all available rules with default settings.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    RuleSet::okta(&Config::default()).into_rules()
}
