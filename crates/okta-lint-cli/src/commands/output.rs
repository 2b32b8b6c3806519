//! Shared output formatting for lint results.

use anyhow::Result;
use okta_lint_core::{HclRunner, IssueDiagnostic, LintResult, Severity};
use std::io::{self, Write};

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat, runner: &HclRunner) -> Result<()> {
    let mut out = io::stdout().lock();
    match format {
        OutputFormat::Text => write_text(&mut out, result, true)?,
        OutputFormat::Json => write_json(&mut out, result)?,
        OutputFormat::Compact => write_compact(&mut out, result)?,
        OutputFormat::Pretty => write_pretty(&mut out, result, runner)?,
    }
    Ok(())
}

fn paint(text: &str, ansi: &str, color: bool) -> String {
    if color {
        format!("\x1b[{ansi}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

fn write_text(out: &mut impl Write, result: &LintResult, color: bool) -> io::Result<()> {
    for issue in &result.issues {
        let ansi = match issue.severity {
            Severity::Error => "31",
            Severity::Warning => "33",
            Severity::Notice => "34",
        };

        writeln!(out, "{} at {}", issue.rule, issue.range)?;
        writeln!(
            out,
            "  {}: {}",
            paint(&issue.severity.to_string(), ansi, color),
            issue.message
        )?;
        writeln!(out)?;
    }

    write_summary(out, result, color)
}

fn write_summary(out: &mut impl Write, result: &LintResult, color: bool) -> io::Result<()> {
    let (errors, warnings, notices) = result.count_by_severity();

    let summary_color = if errors > 0 {
        "31"
    } else if warnings > 0 {
        "33"
    } else {
        "32"
    };

    let summary = format!(
        "Found {errors} error(s), {warnings} warning(s), {notices} notice(s) in {} file(s)",
        result.files_checked
    );
    writeln!(out, "{}", paint(&summary, summary_color, color))
}

fn write_json(out: &mut impl Write, result: &LintResult) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, result)?;
    writeln!(out)?;
    Ok(())
}

fn write_compact(out: &mut impl Write, result: &LintResult) -> io::Result<()> {
    for issue in &result.issues {
        writeln!(out, "{issue}")?;
    }
    Ok(())
}

fn write_pretty(out: &mut impl Write, result: &LintResult, runner: &HclRunner) -> io::Result<()> {
    for issue in &result.issues {
        match runner.source(&issue.range.filename) {
            Some(source) => {
                let report = miette::Report::new(IssueDiagnostic::new(issue, source));
                writeln!(out, "{report:?}")?;
            }
            None => writeln!(out, "{issue}")?,
        }
    }

    write_summary(out, result, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use okta_lint_core::{Issue, Pos, SourceRange};

    fn sample() -> LintResult {
        let mut result = LintResult::new();
        result.files_checked = 2;
        result.issues.push(Issue::new(
            "okta_group_name_prefix",
            Severity::Error,
            "Okta group name must start with 'terraform-'",
            SourceRange::new("groups.tf", Pos::new(2, 3, 31), Pos::new(2, 18, 46)),
        ));
        result.issues.push(Issue::new(
            "okta_group_name_prefix",
            Severity::Warning,
            "Okta group name must start with 'terraform-'",
            SourceRange::new("main.tf", Pos::new(7, 3, 90), Pos::new(7, 15, 102)),
        ));
        result
    }

    fn render(write: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut buf = Vec::new();
        write(&mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn compact_is_one_line_per_issue() {
        let output = render(|buf| write_compact(buf, &sample()).unwrap());
        assert_eq!(output.lines().count(), 2);
        insta::assert_snapshot!(output, @r"
        groups.tf:2:3: error [okta_group_name_prefix] Okta group name must start with 'terraform-'
        main.tf:7:3: warning [okta_group_name_prefix] Okta group name must start with 'terraform-'
        ");
    }

    #[test]
    fn text_lists_issues_then_summary() {
        let output = render(|buf| write_text(buf, &sample(), false).unwrap());
        insta::assert_snapshot!(output, @r"
        okta_group_name_prefix at groups.tf:2:3
          error: Okta group name must start with 'terraform-'

        okta_group_name_prefix at main.tf:7:3
          warning: Okta group name must start with 'terraform-'

        Found 1 error(s), 1 warning(s), 0 notice(s) in 2 file(s)
        ");
    }

    #[test]
    fn text_colors_severity_when_enabled() {
        let output = render(|buf| write_text(buf, &sample(), true).unwrap());
        assert!(output.contains("\x1b[31merror\x1b[0m"));
        assert!(output.contains("\x1b[33mwarning\x1b[0m"));
    }

    #[test]
    fn json_serializes_result() {
        let mut result = sample();
        result.issues.truncate(1);
        let output = render(|buf| write_json(buf, &result).unwrap());
        insta::assert_snapshot!(output, @r#"
        {
          "issues": [
            {
              "rule": "okta_group_name_prefix",
              "severity": "error",
              "message": "Okta group name must start with 'terraform-'",
              "range": {
                "filename": "groups.tf",
                "start": {
                  "line": 2,
                  "column": 3,
                  "byte": 31
                },
                "end": {
                  "line": 2,
                  "column": 18,
                  "byte": 46
                }
              }
            }
          ],
          "files_checked": 2
        }
        "#);
    }

    #[test]
    fn empty_result_prints_clean_summary() {
        let output = render(|buf| write_text(buf, &LintResult::new(), false).unwrap());
        insta::assert_snapshot!(output, @"Found 0 error(s), 0 warning(s), 0 notice(s) in 0 file(s)");
        assert!(render(|buf| write_compact(buf, &LintResult::new()).unwrap()).is_empty());
    }
}
