//! Rule requiring a string attribute to start with a fixed prefix.
//!
//! # Rationale
//!
//! Naming conventions make Terraform-managed objects recognizable in the
//! provider's console. Groups created by hand in Okta and groups owned by
//! Terraform look alike unless the name says who owns them.
//!
//! # Detected Patterns
//!
//! ```hcl
//! resource "okta_group" "admins" {
//!   name = "admins"            # missing "terraform-"
//! }
//! ```
//!
//! # Good Patterns
//!
//! ```hcl
//! resource "okta_group" "admins" {
//!   name = "terraform-admins"
//! }
//!
//! resource "okta_group" "imported" {
//!   # name omitted, nothing to check
//! }
//! ```
//!
//! Values the runner cannot resolve (unset variables, function calls) are
//! left to the runner: it either skips them or fails the check.

use okta_lint_core::{
    Attribute, BodySchema, ResourceBlock, ResourceContent, Rule, RuleConfig, Runner, RunnerError,
    Severity,
};
use tracing::debug;

/// Rule name for the Okta group name prefix rule.
pub const NAME: &str = "okta_group_name_prefix";

/// Prefix required on Okta group names by default.
pub const DEFAULT_PREFIX: &str = "terraform-";

/// Static parameters of a prefix rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixPolicy {
    /// Rule name.
    pub name: String,
    /// Resource type to inspect (e.g., "okta_group").
    pub resource_type: String,
    /// Attribute holding the value to check.
    pub attribute_name: String,
    /// Required prefix; matching is case-sensitive.
    pub prefix: String,
    /// Human label for the resource type used in messages (e.g., "Okta group").
    pub subject: String,
    /// Severity of emitted issues.
    pub severity: Severity,
    /// Whether the rule runs unless disabled by configuration.
    pub enabled: bool,
}

impl PrefixPolicy {
    /// Policy for `okta_group.name` starting with [`DEFAULT_PREFIX`].
    #[must_use]
    pub fn okta_group_name() -> Self {
        Self {
            name: NAME.to_string(),
            resource_type: "okta_group".to_string(),
            attribute_name: "name".to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            subject: "Okta group".to_string(),
            severity: Severity::Error,
            enabled: true,
        }
    }

    /// Returns true if `value` satisfies the policy.
    #[must_use]
    pub fn allows(&self, value: &str) -> bool {
        value.starts_with(&self.prefix)
    }
}

/// Checks that an attribute of one resource type starts with a prefix.
#[derive(Debug, Clone)]
pub struct AttributePrefixRule {
    policy: PrefixPolicy,
    description: String,
}

impl Default for AttributePrefixRule {
    fn default() -> Self {
        Self::okta_group_name()
    }
}

impl AttributePrefixRule {
    /// Creates a rule enforcing `policy`.
    #[must_use]
    pub fn new(policy: PrefixPolicy) -> Self {
        let description = format!(
            "Requires {} `{}` to start with the configured prefix",
            policy.resource_type, policy.attribute_name
        );
        Self {
            policy,
            description,
        }
    }

    /// The `okta_group_name_prefix` rule with default settings.
    #[must_use]
    pub fn okta_group_name() -> Self {
        Self::new(PrefixPolicy::okta_group_name())
    }

    /// Sets the required prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.policy.prefix = prefix.into();
        self
    }

    /// Applies rule options from configuration (`prefix`).
    #[must_use]
    pub fn with_config(self, config: &RuleConfig) -> Self {
        let prefix = config.get_str("prefix", &self.policy.prefix).to_string();
        self.prefix(prefix)
    }

    /// Returns the policy this rule enforces.
    #[must_use]
    pub fn policy(&self) -> &PrefixPolicy {
        &self.policy
    }

    /// Message attached to every violation.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "{} {} must start with '{}'",
            self.policy.subject, self.policy.attribute_name, self.policy.prefix
        )
    }

    /// Yields the blocks that explicitly set the target attribute.
    fn scan<'a>(
        &'a self,
        content: &'a ResourceContent,
    ) -> impl Iterator<Item = (&'a ResourceBlock, &'a Attribute)> + 'a {
        content.with_attribute(&self.policy.attribute_name)
    }

    /// Evaluates each attribute and emits an issue when the prefix is missing.
    fn check_all<'a, I>(&self, runner: &mut dyn Runner, pairs: I) -> Result<(), RunnerError>
    where
        I: IntoIterator<Item = (&'a ResourceBlock, &'a Attribute)>,
    {
        for (block, attribute) in pairs {
            let Some(value) = runner.evaluate_string(attribute)? else {
                debug!(
                    "{}.{}: {} has no static value",
                    block.type_name, block.name, attribute.name
                );
                continue;
            };

            if !self.policy.allows(&value) {
                runner.emit_issue(self, &self.message(), &attribute.range)?;
            }
        }
        Ok(())
    }
}

impl Rule for AttributePrefixRule {
    fn name(&self) -> &str {
        &self.policy.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn enabled(&self) -> bool {
        self.policy.enabled
    }

    fn severity(&self) -> Severity {
        self.policy.severity
    }

    fn check(&self, runner: &mut dyn Runner) -> Result<(), RunnerError> {
        debug!("checking {} rule", self.name());

        let content = runner.get_resource_content(
            &self.policy.resource_type,
            &BodySchema::attributes([self.policy.attribute_name.as_str()]),
        )?;

        self.check_all(runner, self.scan(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use okta_lint_core::{Pos, SourceRange};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// What the mock runner returns when asked for a resource's value.
    #[derive(Clone, Copy)]
    enum Outcome {
        Value(&'static str),
        Skip,
        Fail,
    }

    /// Runner serving canned resources, keyed by resource name.
    #[derive(Default)]
    struct MockRunner {
        resources: Vec<(&'static str, Option<Outcome>)>,
        fail_query: bool,
        fail_emit: bool,
        queries: RefCell<Vec<(String, BodySchema)>>,
        issues: Vec<(String, Severity, String, SourceRange)>,
    }

    impl MockRunner {
        fn with(resources: &[(&'static str, Option<Outcome>)]) -> Self {
            Self {
                resources: resources.to_vec(),
                ..Self::default()
            }
        }

        fn range(name: &str) -> SourceRange {
            SourceRange::new(format!("{name}.tf"), Pos::new(2, 3, 10), Pos::new(2, 20, 27))
        }

        fn outcome(&self, range: &SourceRange) -> Outcome {
            self.resources
                .iter()
                .find(|(name, _)| Self::range(name) == *range)
                .and_then(|(_, o)| *o)
                .unwrap_or(Outcome::Skip)
        }
    }

    impl Runner for MockRunner {
        fn get_resource_content(
            &self,
            resource_type: &str,
            schema: &BodySchema,
        ) -> Result<ResourceContent, RunnerError> {
            self.queries
                .borrow_mut()
                .push((resource_type.to_string(), schema.clone()));
            if self.fail_query {
                return Err(RunnerError::HostQuery {
                    resource_type: resource_type.to_string(),
                    message: "unsupported".to_string(),
                });
            }
            let blocks = self
                .resources
                .iter()
                .map(|(name, outcome)| {
                    let mut attributes = HashMap::new();
                    if outcome.is_some() {
                        for attr in &schema.attributes {
                            attributes.insert(
                                attr.clone(),
                                Attribute {
                                    name: attr.clone(),
                                    expr: hcl_edit::parser::parse_expr("var.any").unwrap(),
                                    range: Self::range(name),
                                },
                            );
                        }
                    }
                    ResourceBlock {
                        type_name: resource_type.to_string(),
                        name: (*name).to_string(),
                        attributes,
                        range: Self::range(name),
                    }
                })
                .collect();
            Ok(ResourceContent { blocks })
        }

        fn evaluate_string(&self, attribute: &Attribute) -> Result<Option<String>, RunnerError> {
            match self.outcome(&attribute.range) {
                Outcome::Value(v) => Ok(Some(v.to_string())),
                Outcome::Skip => Ok(None),
                Outcome::Fail => Err(RunnerError::Evaluation {
                    range: attribute.range.clone(),
                    message: "unknown value".to_string(),
                }),
            }
        }

        fn emit_issue(
            &mut self,
            rule: &dyn Rule,
            message: &str,
            range: &SourceRange,
        ) -> Result<(), RunnerError> {
            if self.fail_emit {
                return Err(RunnerError::Emission {
                    rule: rule.name().to_string(),
                    message: "channel closed".to_string(),
                });
            }
            self.issues.push((
                rule.name().to_string(),
                rule.severity(),
                message.to_string(),
                range.clone(),
            ));
            Ok(())
        }
    }

    fn check(rule: &AttributePrefixRule, runner: &mut MockRunner) -> Result<(), RunnerError> {
        rule.check(runner)
    }

    #[test]
    fn test_rule_identity() {
        let rule = AttributePrefixRule::okta_group_name();
        assert_eq!(rule.name(), "okta_group_name_prefix");
        assert!(rule.enabled());
        assert_eq!(rule.severity(), Severity::Error);
        assert!(rule.description().contains("okta_group `name`"));
    }

    #[test]
    fn test_queries_only_target_attribute() {
        let mut runner = MockRunner::with(&[]);
        check(&AttributePrefixRule::okta_group_name(), &mut runner).unwrap();
        assert_eq!(
            runner.queries.into_inner(),
            vec![("okta_group".to_string(), BodySchema::attributes(["name"]))]
        );
    }

    #[test]
    fn test_prefixed_name_passes() {
        let mut runner = MockRunner::with(&[("g1", Some(Outcome::Value("terraform-admins")))]);
        check(&AttributePrefixRule::okta_group_name(), &mut runner).unwrap();
        assert!(runner.issues.is_empty());
    }

    #[test]
    fn test_unprefixed_name_emits_one_issue() {
        let mut runner = MockRunner::with(&[("g2", Some(Outcome::Value("admins")))]);
        check(&AttributePrefixRule::okta_group_name(), &mut runner).unwrap();

        assert_eq!(runner.issues.len(), 1);
        let (rule, severity, message, range) = &runner.issues[0];
        assert_eq!(rule, NAME);
        assert_eq!(*severity, Severity::Error);
        insta::assert_snapshot!(message.as_str(), @"Okta group name must start with 'terraform-'");
        assert_eq!(range.filename, PathBuf::from("g2.tf"));
    }

    #[test]
    fn test_absent_attribute_is_skipped() {
        let mut runner = MockRunner::with(&[("g3", None)]);
        check(&AttributePrefixRule::okta_group_name(), &mut runner).unwrap();
        assert!(runner.issues.is_empty());
    }

    #[test]
    fn test_unresolved_value_is_skipped() {
        let mut runner = MockRunner::with(&[("g4", Some(Outcome::Skip))]);
        check(&AttributePrefixRule::okta_group_name(), &mut runner).unwrap();
        assert!(runner.issues.is_empty());
    }

    #[test]
    fn test_only_violating_resource_reported() {
        let mut runner = MockRunner::with(&[
            ("ok", Some(Outcome::Value("terraform-ok"))),
            ("bad", Some(Outcome::Value("bad"))),
        ]);
        check(&AttributePrefixRule::okta_group_name(), &mut runner).unwrap();
        assert_eq!(runner.issues.len(), 1);
        assert_eq!(runner.issues[0].3.filename, PathBuf::from("bad.tf"));
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        let mut runner = MockRunner::with(&[("g", Some(Outcome::Value("Terraform-admins")))]);
        check(&AttributePrefixRule::okta_group_name(), &mut runner).unwrap();
        assert_eq!(runner.issues.len(), 1);
    }

    #[test]
    fn test_empty_prefix_allows_everything() {
        let rule = AttributePrefixRule::okta_group_name().prefix("");
        let mut runner = MockRunner::with(&[
            ("a", Some(Outcome::Value("admins"))),
            ("b", Some(Outcome::Value(""))),
        ]);
        check(&rule, &mut runner).unwrap();
        assert!(runner.issues.is_empty());
    }

    #[test]
    fn test_evaluation_error_aborts_pass() {
        let mut runner = MockRunner::with(&[
            ("first", Some(Outcome::Value("bad"))),
            ("broken", Some(Outcome::Fail)),
            ("after", Some(Outcome::Value("also-bad"))),
        ]);
        let err = check(&AttributePrefixRule::okta_group_name(), &mut runner).unwrap_err();
        assert!(matches!(err, RunnerError::Evaluation { .. }));
        // Issues before the failure stay recorded; nothing after it is checked.
        assert_eq!(runner.issues.len(), 1);
        assert_eq!(runner.issues[0].3.filename, PathBuf::from("first.tf"));
    }

    #[test]
    fn test_query_error_propagates() {
        let mut runner = MockRunner {
            fail_query: true,
            ..MockRunner::default()
        };
        let err = check(&AttributePrefixRule::okta_group_name(), &mut runner).unwrap_err();
        assert!(matches!(err, RunnerError::HostQuery { .. }));
    }

    #[test]
    fn test_emission_error_propagates() {
        let mut runner = MockRunner::with(&[("g", Some(Outcome::Value("admins")))]);
        runner.fail_emit = true;
        let err = check(&AttributePrefixRule::okta_group_name(), &mut runner).unwrap_err();
        assert!(matches!(err, RunnerError::Emission { .. }));
    }

    #[test]
    fn test_with_config_overrides_prefix() {
        let config = okta_lint_core::Config::parse(
            "[rules.okta_group_name_prefix]\nprefix = \"tf-\"\n",
        )
        .unwrap();
        let rule = AttributePrefixRule::okta_group_name().with_config(config.rule(NAME).unwrap());
        assert_eq!(rule.policy().prefix, "tf-");
        assert_eq!(rule.message(), "Okta group name must start with 'tf-'");

        let unchanged =
            AttributePrefixRule::okta_group_name().with_config(&RuleConfig::default());
        assert_eq!(unchanged.policy().prefix, DEFAULT_PREFIX);
    }
}
