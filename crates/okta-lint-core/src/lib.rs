//! # okta-lint-core
//!
//! Core framework for policy linting of Terraform configuration.
//!
//! This crate provides the foundational traits and types for building
//! Terraform policy rules. It includes:
//!
//! - [`Rule`] trait implemented by every policy rule
//! - [`Runner`] trait, the host capabilities a rule may use
//! - [`HclRunner`], a runner over the `.tf` files of one module
//! - [`Analyzer`] for running enabled rules and collecting [`Issue`]s
//!
//! ## Example
//!
//! ```ignore
//! use okta_lint_core::{Analyzer, Config};
//!
//! let analyzer = Analyzer::builder()
//!     .config(Config::default())
//!     .rule(MyRule::new())
//!     .build();
//!
//! let result = analyzer.analyze_dir(Path::new("./infra"))?;
//! for issue in &result.issues {
//!     println!("{issue}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod rule;
mod runner;
mod types;

/// HCL host engine.
pub mod hcl;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, EvaluationConfig, RuleConfig, UnresolvedPolicy};
pub use hcl::{HclRunner, LoadError};
pub use rule::{Rule, RuleBox};
pub use runner::{
    Attribute, BodySchema, Expression, ResourceBlock, ResourceContent, Runner, RunnerError,
};
pub use types::{Issue, IssueDiagnostic, LintResult, Pos, Severity, SourceRange};
