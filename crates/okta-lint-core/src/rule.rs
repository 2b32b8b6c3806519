//! Rule trait for defining policy rules.

use crate::runner::{Runner, RunnerError};
use crate::types::Severity;

/// A policy rule evaluated against the configuration loaded by a [`Runner`].
///
/// Rules are stateless: every call to [`Rule::check`] is a one-shot sweep over
/// what the runner currently holds. Findings are handed to the runner through
/// [`Runner::emit_issue`] as they are discovered.
///
/// # Example
///
/// ```ignore
/// use okta_lint_core::{BodySchema, Rule, Runner, RunnerError, Severity};
///
/// pub struct NoEmptyDescriptions;
///
/// impl Rule for NoEmptyDescriptions {
///     fn name(&self) -> &str { "okta_group_description" }
///     fn enabled(&self) -> bool { false }
///     fn severity(&self) -> Severity { Severity::Notice }
///
///     fn check(&self, runner: &mut dyn Runner) -> Result<(), RunnerError> {
///         let content = runner.get_resource_content(
///             "okta_group",
///             &BodySchema::attributes(["description"]),
///         )?;
///         for (_, attribute) in content.with_attribute("description") {
///             if runner.evaluate_string(attribute)?.as_deref() == Some("") {
///                 runner.emit_issue(self, "description is empty", &attribute.range)?;
///             }
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the snake_case name of this rule (e.g., "okta_group_name_prefix").
    fn name(&self) -> &str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &str {
        ""
    }

    /// Whether the rule runs when configuration does not mention it.
    fn enabled(&self) -> bool {
        true
    }

    /// Returns the severity attached to issues from this rule.
    fn severity(&self) -> Severity {
        Severity::Error
    }

    /// Checks the configuration held by `runner`, emitting issues through it.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by the runner. Issues emitted before
    /// the error stay recorded in the runner.
    fn check(&self, runner: &mut dyn Runner) -> Result<(), RunnerError>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
