//! # okta-lint-rules
//!
//! Okta ruleset for okta-lint.
//!
//! ## Available Rules
//!
//! | Name | Default severity | Description |
//! |------|------------------|-------------|
//! | `okta_group_name_prefix` | error | Requires `okta_group` names to start with `terraform-` |
//!
//! ## Usage
//!
//! ```ignore
//! use okta_lint_core::{Analyzer, Config};
//! use okta_lint_rules::RuleSet;
//!
//! let config = Config::default();
//! let analyzer = Analyzer::builder()
//!     .rules(RuleSet::okta(&config).into_rules())
//!     .config(config)
//!     .build();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod attribute_prefix;
mod ruleset;

pub use attribute_prefix::{AttributePrefixRule, PrefixPolicy};
pub use ruleset::{all_rules, RuleSet};

/// Re-export core types for convenience.
pub use okta_lint_core::{Issue, Rule, Severity};
