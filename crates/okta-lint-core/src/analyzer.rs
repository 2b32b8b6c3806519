//! Core analyzer for orchestrating lint execution.

use crate::config::Config;
use crate::hcl::{HclRunner, LoadError};
use crate::rule::{Rule, RuleBox};
use crate::runner::RunnerError;
use crate::types::{Issue, LintResult};

use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The module could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A rule failed while checking.
    #[error("rule `{rule}` failed: {source}")]
    Rule {
        /// Name of the failing rule.
        rule: String,
        /// Error reported by the runner.
        source: RunnerError,
    },
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    rules: Vec<RuleBox>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds boxed rules to the analyzer.
    #[must_use]
    pub fn rules<I: IntoIterator<Item = RuleBox>>(mut self, rules: I) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer.
    #[must_use]
    pub fn build(self) -> Analyzer {
        Analyzer {
            rules: self.rules,
            config: self.config.unwrap_or_default(),
        }
    }
}

/// Runs enabled rules against a loaded module.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    rules: Vec<RuleBox>,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Loads the module in `dir` and analyzes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the module cannot be loaded or a rule fails.
    pub fn analyze_dir(&self, dir: &Path) -> Result<LintResult, AnalyzerError> {
        let mut runner = HclRunner::load(dir, &self.config)?;
        self.analyze(&mut runner)
    }

    /// Runs every enabled rule against `runner`.
    ///
    /// Issues left in the runner by a previous run are discarded first. The
    /// first rule error aborts the analysis.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Rule`] if a rule reports a runner error.
    pub fn analyze(&self, runner: &mut HclRunner) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis of {} file(s)", runner.file_count());
        runner.take_issues();

        let mut result = LintResult::new();
        result.files_checked = runner.file_count();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name(), rule.enabled()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let checked = rule.check(runner);
            // Keep what was emitted before a failure out of the next run.
            let issues = runner.take_issues();
            checked.map_err(|source| AnalyzerError::Rule {
                rule: rule.name().to_string(),
                source,
            })?;

            result
                .issues
                .extend(self.apply_severity_override(rule.name(), issues));
        }

        // Sort issues by file, then position
        result.issues.sort_by(|a, b| {
            a.range
                .filename
                .cmp(&b.range.filename)
                .then(a.range.start.cmp(&b.range.start))
        });

        info!(
            "Analysis complete: {} issue(s) in {} file(s)",
            result.issues.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(&self, rule_name: &str, mut issues: Vec<Issue>) -> Vec<Issue> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for issue in &mut issues {
                issue.severity = severity;
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use crate::runner::{BodySchema, Runner};
    use crate::types::Severity;

    /// Flags every `okta_group` whose `name` is exactly "bad".
    struct NoBadNames;

    impl Rule for NoBadNames {
        fn name(&self) -> &str {
            "no_bad_names"
        }

        fn check(&self, runner: &mut dyn Runner) -> Result<(), RunnerError> {
            let content =
                runner.get_resource_content("okta_group", &BodySchema::attributes(["name"]))?;
            for (_, attr) in content.with_attribute("name") {
                if runner.evaluate_string(attr)?.as_deref() == Some("bad") {
                    runner.emit_issue(self, "bad name", &attr.range)?;
                }
            }
            Ok(())
        }
    }

    /// Always fails with a query error.
    struct BrokenQuery;

    impl Rule for BrokenQuery {
        fn name(&self) -> &str {
            "broken_query"
        }

        fn check(&self, runner: &mut dyn Runner) -> Result<(), RunnerError> {
            runner.get_resource_content("not valid", &BodySchema::default())?;
            Ok(())
        }
    }

    fn module(sources: &[(&str, &str)]) -> HclRunner {
        HclRunner::from_sources(
            sources.iter().map(|(p, c)| (*p, (*c).to_string())),
            &Config::default(),
        )
        .unwrap()
    }

    const SOURCES: &[(&str, &str)] = &[
        ("b.tf", "resource \"okta_group\" \"x\" {\n  name = \"bad\"\n}\n"),
        (
            "a.tf",
            "resource \"okta_group\" \"y\" {\n  name = \"good\"\n}\n\nresource \"okta_group\" \"z\" {\n  name = \"bad\"\n}\n",
        ),
    ];

    #[test]
    fn test_issues_are_sorted_by_location() {
        let analyzer = Analyzer::builder().rule(NoBadNames).build();
        let result = analyzer.analyze(&mut module(SOURCES)).unwrap();

        let locations: Vec<String> = result.issues.iter().map(|i| i.range.to_string()).collect();
        assert_eq!(locations, vec!["a.tf:6:3", "b.tf:2:3"]);
        assert_eq!(result.files_checked, 2);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let analyzer = Analyzer::builder().rule(NoBadNames).build();
        let mut runner = module(SOURCES);

        let first = analyzer.analyze(&mut runner).unwrap();
        let second = analyzer.analyze(&mut runner).unwrap();
        assert_eq!(first.issues, second.issues);
    }

    #[test]
    fn test_disabled_rule_is_skipped() {
        let mut config = Config::default();
        config.rules.insert(
            "no_bad_names".to_string(),
            RuleConfig {
                enabled: Some(false),
                ..RuleConfig::default()
            },
        );
        let analyzer = Analyzer::builder().rule(NoBadNames).config(config).build();
        let result = analyzer.analyze(&mut module(SOURCES)).unwrap();
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_severity_override() {
        let mut config = Config::default();
        config.rules.insert(
            "no_bad_names".to_string(),
            RuleConfig {
                severity: Some(Severity::Notice),
                ..RuleConfig::default()
            },
        );
        let analyzer = Analyzer::builder().rule(NoBadNames).config(config).build();
        let result = analyzer.analyze(&mut module(SOURCES)).unwrap();
        assert_eq!(result.count_by_severity(), (0, 0, 2));
    }

    #[test]
    fn test_rule_error_aborts() {
        let analyzer = Analyzer::builder()
            .rule(BrokenQuery)
            .rule(NoBadNames)
            .build();
        let err = analyzer.analyze(&mut module(SOURCES)).unwrap_err();
        match err {
            AnalyzerError::Rule { rule, source } => {
                assert_eq!(rule, "broken_query");
                assert!(matches!(source, RunnerError::HostQuery { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
