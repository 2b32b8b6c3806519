//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# okta-lint configuration

[analyzer]
# Glob patterns to exclude from analysis
exclude = [
    "**/.terraform/**",
]

[evaluation]
# What to do when an attribute value cannot be determined statically:
# "skip" leaves it unchecked, "error" aborts the run
unresolved = "skip"

# Extra input variable values, applied after terraform.tfvars
# and *.auto.tfvars
[variables]
# team = "platform"

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.okta_group_name_prefix]
enabled = true
# severity = "warning"  # Override default severity
prefix = "terraform-"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("okta-lint.toml");
    write_config(config_path, force)?;

    println!("Created okta-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit okta-lint.toml to configure rules");
    println!("  2. Run: okta-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use okta_lint_core::{Config, UnresolvedPolicy};
    use tempfile::TempDir;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.evaluation.unresolved, UnresolvedPolicy::Skip);
        assert!(config.is_rule_enabled("okta_group_name_prefix", false));
        assert_eq!(
            config
                .rule("okta_group_name_prefix")
                .unwrap()
                .get_str("prefix", ""),
            "terraform-"
        );
    }

    #[test]
    fn existing_config_requires_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("okta-lint.toml");
        std::fs::write(&path, "# mine").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
