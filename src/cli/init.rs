//! Initialize a formrules project
//!
//! Writes a starter formrules.toml that parses and compiles as-is.

use std::fs;
use std::path::Path;

/// Default content for formrules.toml
pub(crate) const DEFAULT_FORMRULES_TOML: &str = r#"[validator]
# Trigger used by rules that specify none: "change", "blur" or both
trigger = "blur"

# Regex-backed rules, available to every field
# [rules.zipcode]
# pattern = '^\d{6}$'
# template = "[0] 格式不正确"
# trigger = "blur"

# One table per form field; keys other than label, trigger and type are rule
# names with their constraint values
[fields.username]
label = "用户名"
required = true
rangelength = [3, 16]

[fields.password]
label = "密码"
required = true
minlength = 6

[fields.email]
label = "邮箱"
email = { value = true, message = "请输入有效邮箱地址" }

[output]
format = "human"
"#;

const CONFIG_FILE: &str = "formrules.toml";

/// Error type for init command
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Path error
    #[error("Path error: {0}")]
    Path(String),
}

/// Result of init command
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InitResult {
    /// Files that were created
    pub created: Vec<String>,
    /// Files that were skipped (already existed)
    pub skipped: Vec<String>,
    /// Files that were overwritten
    pub overwritten: Vec<String>,
}

/// Run the init command in the current directory
pub fn run_init(force: bool) -> Result<InitResult, InitError> {
    run_init_in(Path::new("."), force)
}

/// Write formrules.toml into `dir`
///
/// Existing files are skipped unless `force` is set.
pub fn run_init_in(dir: &Path, force: bool) -> Result<InitResult, InitError> {
    if !dir.is_dir() {
        return Err(InitError::Path(format!(
            "'{}' is not a directory",
            dir.display()
        )));
    }

    let mut result = InitResult::default();
    let path = dir.join(CONFIG_FILE);

    if path.exists() {
        if force {
            fs::write(&path, DEFAULT_FORMRULES_TOML)?;
            result.overwritten.push(CONFIG_FILE.to_string());
        } else {
            result.skipped.push(CONFIG_FILE.to_string());
        }
    } else {
        fs::write(&path, DEFAULT_FORMRULES_TOML)?;
        result.created.push(CONFIG_FILE.to_string());
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_config() {
        let temp_dir = TempDir::new().unwrap();
        let result = run_init_in(temp_dir.path(), false).expect("init should succeed");

        assert_eq!(result.created, vec!["formrules.toml"]);
        assert!(result.skipped.is_empty());
        assert!(result.overwritten.is_empty());

        let content = fs::read_to_string(temp_dir.path().join("formrules.toml")).unwrap();
        assert_eq!(content, DEFAULT_FORMRULES_TOML);
    }

    #[test]
    fn test_init_skips_existing_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("formrules.toml");
        fs::write(&path, "existing content").unwrap();

        let result = run_init_in(temp_dir.path(), false).expect("init should succeed");
        assert_eq!(result.skipped, vec!["formrules.toml"]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "existing content");
    }

    #[test]
    fn test_init_overwrites_with_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("formrules.toml");
        fs::write(&path, "old content").unwrap();

        let result = run_init_in(temp_dir.path(), true).expect("init should succeed");
        assert_eq!(result.overwritten, vec!["formrules.toml"]);
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_FORMRULES_TOML);
    }

    #[test]
    fn test_init_rejects_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let err = run_init_in(&temp_dir.path().join("missing"), false).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_default_config_compiles() {
        let config = Config::parse(DEFAULT_FORMRULES_TOML).unwrap();
        let validator = config.build_validator().unwrap();
        let compiled = validator.compile(&config.form_rules().unwrap()).unwrap();

        assert_eq!(compiled.len(), 3);
        assert!(compiled.warnings().is_empty());
    }
}
