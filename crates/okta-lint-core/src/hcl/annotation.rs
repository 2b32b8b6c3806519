//! Comment-based ignore annotations.
//!
//! Supports annotations like:
//! ```text
//! # okta-lint-ignore: okta_group_name_prefix reason="legacy group"
//! resource "okta_group" "admins" {
//!   name = "admins" // okta-lint-ignore: all
//! }
//! ```

use std::collections::HashSet;

const MARKER: &str = "okta-lint-ignore:";

/// Parsed ignore annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreAnnotation {
    /// Rule names that are ignored (`all` matches every rule).
    pub rules: HashSet<String>,
    /// Optional reason for the exception.
    pub reason: Option<String>,
}

impl IgnoreAnnotation {
    /// Returns true if this annotation covers `rule_name`.
    #[must_use]
    pub fn covers(&self, rule_name: &str) -> bool {
        self.rules.contains(rule_name) || self.rules.contains("all")
    }
}

/// Finds an annotation covering `rule_name` on `line`, or on the line before
/// it when that line holds nothing but the comment.
///
/// `line` is 1-indexed.
#[must_use]
pub fn find_ignore(content: &str, line: usize, rule_name: &str) -> Option<IgnoreAnnotation> {
    let lines: Vec<&str> = content.lines().collect();
    let at = |l: usize| l.checked_sub(1).and_then(|i| lines.get(i)).copied();

    let own = at(line).and_then(parse_annotation);
    let previous = at(line.saturating_sub(1))
        .filter(|text| is_comment_line(text))
        .and_then(parse_annotation);

    own.into_iter().chain(previous).find(|a| a.covers(rule_name))
}

fn is_comment_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('#') || trimmed.starts_with("//")
}

/// Parses an ignore annotation from a line, if its comment carries one.
fn parse_annotation(line: &str) -> Option<IgnoreAnnotation> {
    let marker_at = line.find(MARKER)?;

    // The marker must open a `#` or `//` comment.
    let before = line[..marker_at].trim_end();
    if !(before.ends_with('#') || before.ends_with("//")) {
        return None;
    }

    let rest = line[marker_at + MARKER.len()..].trim();
    let (rules_str, reason) = match rest.find("reason=") {
        Some(i) => (&rest[..i], parse_reason(&rest[i + "reason=".len()..])),
        None => (rest, None),
    };

    let rules: HashSet<String> = rules_str
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    Some(IgnoreAnnotation { rules, reason })
}

fn parse_reason(s: &str) -> Option<String> {
    let quoted = s.trim().strip_prefix('"')?;
    let end = quoted.find('"')?;
    Some(quoted[..end].to_string())
}
