//! Host capabilities consumed by rules.
//!
//! A [`Runner`] owns the parsed configuration. Rules query it for resource
//! blocks, ask it to evaluate attribute expressions, and hand it the issues
//! they find. The runner decides how values are resolved and how issues are
//! recorded; rules never look past this interface.

use crate::rule::Rule;
use crate::types::SourceRange;
use std::collections::HashMap;

pub use hcl_edit::expr::Expression;

/// Errors reported by a [`Runner`].
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The resource query or its schema was rejected.
    #[error("invalid query for `{resource_type}` resources: {message}")]
    HostQuery {
        /// Resource type that was requested.
        resource_type: String,
        /// Why the query was rejected.
        message: String,
    },

    /// An expression could not be resolved to the requested type.
    #[error("{range}: failed to evaluate expression: {message}")]
    Evaluation {
        /// Location of the expression.
        range: SourceRange,
        /// Why evaluation failed.
        message: String,
    },

    /// An issue could not be recorded.
    #[error("failed to emit issue for rule `{rule}`: {message}")]
    Emission {
        /// Rule that tried to emit.
        rule: String,
        /// Why emission failed.
        message: String,
    },
}

/// Attribute names a rule wants populated on returned blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodySchema {
    /// Requested attribute names.
    pub attributes: Vec<String>,
}

impl BodySchema {
    /// Creates a schema requesting the given attributes.
    #[must_use]
    pub fn attributes<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `name` was requested.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }
}

/// An attribute explicitly written in configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Unevaluated expression on the right-hand side.
    pub expr: Expression,
    /// Range of the whole `name = expr` attribute.
    pub range: SourceRange,
}

/// One declared `resource "<type>" "<name>"` block.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceBlock {
    /// Resource type label (e.g., "okta_group").
    pub type_name: String,
    /// Resource name label (e.g., "admins").
    pub name: String,
    /// Requested attributes that are present in the block.
    pub attributes: HashMap<String, Attribute>,
    /// Range of the block header.
    pub range: SourceRange,
}

impl ResourceBlock {
    /// Returns the attribute if it was explicitly set.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }
}

/// Resource blocks returned by [`Runner::get_resource_content`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceContent {
    /// Matching blocks, in the order the runner discovered them.
    pub blocks: Vec<ResourceBlock>,
}

impl ResourceContent {
    /// Iterates over `(block, attribute)` pairs for blocks that set `name`.
    ///
    /// Blocks where the attribute is absent are skipped.
    pub fn with_attribute<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (&'a ResourceBlock, &'a Attribute)> + 'a {
        self.blocks
            .iter()
            .filter_map(move |block| block.attribute(name).map(|attr| (block, attr)))
    }
}

/// The analysis host, as seen by a rule.
pub trait Runner {
    /// Returns every declared resource of `resource_type`, with only the
    /// attributes named in `schema` populated.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::HostQuery`] if the type or schema is invalid.
    fn get_resource_content(
        &self,
        resource_type: &str,
        schema: &BodySchema,
    ) -> Result<ResourceContent, RunnerError>;

    /// Resolves an attribute's expression to a string.
    ///
    /// `Ok(None)` means the runner chose not to produce a value (for example
    /// an unknown or null value) and the caller should move on.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Evaluation`] if the expression cannot be
    /// converted to a string, or if the runner treats unresolvable values as
    /// errors.
    fn evaluate_string(&self, attribute: &Attribute) -> Result<Option<String>, RunnerError>;

    /// Records an issue for `rule` at `range`.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Emission`] if the issue cannot be recorded.
    fn emit_issue(
        &mut self,
        rule: &dyn Rule,
        message: &str,
        range: &SourceRange,
    ) -> Result<(), RunnerError>;
}
