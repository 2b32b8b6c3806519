//! HCL host engine for Terraform modules.
//!
//! [`HclRunner`] loads the `.tf` files of one module directory with
//! `hcl-edit`, answers resource queries with span-accurate ranges, evaluates
//! attribute expressions statically and collects emitted issues.

pub mod annotation;
mod eval;
mod source;

use crate::config::{Config, UnresolvedPolicy};
use crate::rule::Rule;
use crate::runner::{Attribute, BodySchema, ResourceBlock, ResourceContent, Runner, RunnerError};
use crate::types::{Issue, SourceRange};

use eval::{Binding, Evaluator, Value};
use hcl_edit::expr::Expression;
use hcl_edit::structure::{Block, BlockLabel, Structure};
use hcl_edit::Span;
use source::SourceFile;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading a module.
#[derive(Debug, Error)]
pub enum LoadError {
    /// IO error reading a file.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Error parsing an HCL file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),
}

/// A [`Runner`] over one Terraform module held in memory.
#[derive(Debug)]
pub struct HclRunner {
    files: Vec<SourceFile>,
    variables: HashMap<String, Option<Binding>>,
    locals: HashMap<String, Expression>,
    unresolved: UnresolvedPolicy,
    issues: Vec<Issue>,
}

impl HclRunner {
    /// Loads the module in `dir`: every `*.tf` file directly inside it, plus
    /// `terraform.tfvars` and `*.auto.tfvars`.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or parsed.
    pub fn load(dir: &Path, config: &Config) -> Result<Self, LoadError> {
        let excludes = config
            .analyzer
            .exclude
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mut sources = Vec::new();
        for pattern in ["*.tf", "terraform.tfvars", "*.auto.tfvars"] {
            let pattern = dir.join(pattern);
            for entry in glob::glob(&pattern.to_string_lossy())? {
                let path = entry.map_err(|e| LoadError::Io {
                    path: e.path().to_path_buf(),
                    source: std::io::Error::from(e),
                })?;
                if excludes.iter().any(|p| p.matches_path(&path)) {
                    debug!("Excluding: {}", path.display());
                    continue;
                }
                let content = std::fs::read_to_string(&path).map_err(|e| LoadError::Io {
                    path: path.clone(),
                    source: e,
                })?;
                sources.push((path, content));
            }
        }

        Self::from_sources(sources, config)
    }

    /// Builds a runner from in-memory files.
    ///
    /// Paths ending in `.tfvars` provide variable values; every other source
    /// is a module file. Variable files apply in order: `terraform.tfvars`
    /// first, then the rest sorted by path.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed.
    pub fn from_sources<I, P>(sources: I, config: &Config) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = (P, String)>,
        P: Into<PathBuf>,
    {
        let mut files = Vec::new();
        let mut var_files = Vec::new();
        for (path, content) in sources {
            let file = SourceFile::parse(path, content)?;
            if file.path().extension().is_some_and(|e| e == "tfvars") {
                var_files.push(file);
            } else {
                files.push(file);
            }
        }
        var_files.sort_by_key(|f| (!f.path().ends_with("terraform.tfvars"), f.path.clone()));

        let mut variables = HashMap::new();
        let mut locals = HashMap::new();
        for file in &files {
            for block in top_level_blocks(&file.body) {
                match block.ident.as_str() {
                    "variable" => {
                        let Some(name) = block.labels.first().map(label_str) else {
                            continue;
                        };
                        let default = block
                            .body
                            .iter()
                            .find_map(|s| attribute_named(s, "default"))
                            .map(|attr| Binding::Expr(attr.value.clone()));
                        variables.insert(name.to_string(), default);
                    }
                    "locals" => {
                        for attr in block.body.iter().filter_map(as_attribute) {
                            locals.insert(attr.key.as_str().to_string(), attr.value.clone());
                        }
                    }
                    _ => {}
                }
            }
        }

        for file in &var_files {
            for attr in file.body.iter().filter_map(as_attribute) {
                variables.insert(
                    attr.key.as_str().to_string(),
                    Some(Binding::Expr(attr.value.clone())),
                );
            }
        }

        for (name, value) in &config.variables {
            variables.insert(name.clone(), Some(Binding::Literal(value.clone())));
        }

        debug!(
            "Loaded {} module file(s), {} variable file(s), {} variable(s), {} local(s)",
            files.len(),
            var_files.len(),
            variables.len(),
            locals.len()
        );

        Ok(Self {
            files,
            variables,
            locals,
            unresolved: config.evaluation.unresolved,
            issues: Vec::new(),
        })
    }

    /// Sets an input variable, overriding every other source.
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables
            .insert(name.into(), Some(Binding::Literal(value.into())));
        self
    }

    /// Sets how unresolvable expressions are handled.
    #[must_use]
    pub fn with_unresolved_policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved = policy;
        self
    }

    /// Returns the number of module files loaded.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Returns the content of a loaded module file.
    #[must_use]
    pub fn source(&self, path: &Path) -> Option<&str> {
        self.file(path).map(|f| f.content.as_str())
    }

    /// Returns the issues emitted so far.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Removes and returns the issues emitted so far.
    pub fn take_issues(&mut self) -> Vec<Issue> {
        std::mem::take(&mut self.issues)
    }

    fn file(&self, path: &Path) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.path() == path)
    }

    fn resource_block(file: &SourceFile, block: &Block, schema: &BodySchema) -> ResourceBlock {
        let attributes = block
            .body
            .iter()
            .filter_map(as_attribute)
            .filter(|attr| schema.contains(attr.key.as_str()))
            .map(|attr| {
                let name = attr.key.as_str().to_string();
                let attribute = Attribute {
                    name: name.clone(),
                    expr: attr.value.clone(),
                    range: file.range(attr.span()),
                };
                (name, attribute)
            })
            .collect();

        // Definition range: from `resource` through the last label.
        let start = block.ident.span().map(|s| s.start);
        let end = block.labels.last().and_then(label_span).map(|s| s.end);
        let header = match (start, end) {
            (Some(start), Some(end)) => Some(start..end),
            _ => block.span(),
        };

        ResourceBlock {
            type_name: block.labels.first().map(label_str).unwrap_or_default().to_string(),
            name: block.labels.get(1).map(label_str).unwrap_or_default().to_string(),
            attributes,
            range: file.range(header),
        }
    }
}

impl Runner for HclRunner {
    fn get_resource_content(
        &self,
        resource_type: &str,
        schema: &BodySchema,
    ) -> Result<ResourceContent, RunnerError> {
        let invalid = |message: String| RunnerError::HostQuery {
            resource_type: resource_type.to_string(),
            message,
        };
        if !is_identifier(resource_type) {
            return Err(invalid(format!("`{resource_type}` is not a valid resource type")));
        }
        if let Some(bad) = schema.attributes.iter().find(|a| !is_identifier(a)) {
            return Err(invalid(format!("`{bad}` is not a valid attribute name")));
        }

        let mut blocks = Vec::new();
        for file in &self.files {
            for block in top_level_blocks(&file.body) {
                if block.ident.as_str() != "resource" || block.labels.len() < 2 {
                    continue;
                }
                if label_str(&block.labels[0]) == resource_type {
                    blocks.push(Self::resource_block(file, block, schema));
                }
            }
        }

        debug!("Found {} `{}` resource(s)", blocks.len(), resource_type);
        Ok(ResourceContent { blocks })
    }

    fn evaluate_string(&self, attribute: &Attribute) -> Result<Option<String>, RunnerError> {
        let evaluator = Evaluator {
            variables: &self.variables,
            locals: &self.locals,
        };

        match evaluator.eval(&attribute.expr) {
            Value::String(s) => Ok(Some(s)),
            Value::Null => {
                debug!("{}: `{}` is null, skipping", attribute.range, attribute.name);
                Ok(None)
            }
            Value::Unknown => match self.unresolved {
                UnresolvedPolicy::Skip => {
                    debug!(
                        "{}: `{}` is not statically known, skipping",
                        attribute.range, attribute.name
                    );
                    Ok(None)
                }
                UnresolvedPolicy::Error => Err(RunnerError::Evaluation {
                    range: attribute.range.clone(),
                    message: format!("value of `{}` cannot be determined statically", attribute.name),
                }),
            },
            Value::Mismatch(kind) => Err(RunnerError::Evaluation {
                range: attribute.range.clone(),
                message: format!("`{}` is a {kind}, expected a string", attribute.name),
            }),
        }
    }

    fn emit_issue(
        &mut self,
        rule: &dyn Rule,
        message: &str,
        range: &SourceRange,
    ) -> Result<(), RunnerError> {
        let file = self
            .file(&range.filename)
            .ok_or_else(|| RunnerError::Emission {
                rule: rule.name().to_string(),
                message: format!("{} is not part of the loaded module", range.filename.display()),
            })?;

        if let Some(annotation) = annotation::find_ignore(&file.content, range.start.line, rule.name()) {
            debug!(
                "{}: `{}` ignored by annotation{}",
                range,
                rule.name(),
                annotation
                    .reason
                    .map(|r| format!(" ({r})"))
                    .unwrap_or_default()
            );
            return Ok(());
        }

        self.issues
            .push(Issue::new(rule.name(), rule.severity(), message, range.clone()));
        Ok(())
    }
}

fn top_level_blocks(body: &hcl_edit::structure::Body) -> impl Iterator<Item = &Block> {
    body.iter().filter_map(|s| match s {
        Structure::Block(block) => Some(block),
        Structure::Attribute(_) => None,
    })
}

fn as_attribute(structure: &Structure) -> Option<&hcl_edit::structure::Attribute> {
    match structure {
        Structure::Attribute(attr) => Some(attr),
        Structure::Block(_) => None,
    }
}

fn attribute_named<'a>(
    structure: &'a Structure,
    name: &str,
) -> Option<&'a hcl_edit::structure::Attribute> {
    as_attribute(structure).filter(|attr| attr.key.as_str() == name)
}

fn label_str(label: &BlockLabel) -> &str {
    match label {
        BlockLabel::Ident(ident) => ident.as_str(),
        BlockLabel::String(s) => s.as_str(),
    }
}

fn label_span(label: &BlockLabel) -> Option<std::ops::Range<usize>> {
    match label {
        BlockLabel::Ident(ident) => ident.span(),
        BlockLabel::String(s) => s.span(),
    }
}

/// Terraform identifier: a letter or `_`, then letters, digits, `_` or `-`.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
