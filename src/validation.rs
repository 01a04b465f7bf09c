use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Result, ToolsError};

const MAX_NAME_LEN: usize = 255;

/// Device names Windows refuses as file or directory names.
const RESERVED_NAMES: &[&str] = &[
    "con", "prn", "aux", "nul", "com0", "com1", "com2", "com3", "com4", "com5", "com6", "com7",
    "com8", "com9", "lpt0", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// Extensions the scaffolder is allowed to create.
pub const PERMITTED_EXTENSIONS: &[&str] =
    &["cpp", "c", "h", "hpp", "hlsl", "hlsli", "txt", "py", "cs"];

static NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_\-.]+$").expect("valid regex"));
static EXTENSION_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("valid regex"));
static TEMPLATE_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_\-]+$").expect("valid regex"));

pub fn validate_file_name(name: &str) -> bool {
    name.len() <= MAX_NAME_LEN
        && !RESERVED_NAMES.contains(&name.to_lowercase().as_str())
        && NAME_CHARS.is_match(name)
        && !name.starts_with('.')
        && !name.ends_with('.')
}

pub fn validate_directory_name(name: &str) -> bool {
    validate_file_name(name)
}

/// `ext` is given without the leading dot.
pub fn validate_file_extension(ext: &str) -> bool {
    PERMITTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()) && EXTENSION_CHARS.is_match(ext)
}

/// Splits `File.ext` into stem and extension, requiring exactly one extension
/// from the permitted set.
pub fn split_file_name(file_name: &str) -> Result<(&str, &str)> {
    let mut parts = file_name.split('.');
    let stem = parts.next().unwrap_or_default();
    if !validate_file_name(stem) {
        return Err(ToolsError::InvalidName(file_name.to_string()));
    }

    match (parts.next(), parts.next()) {
        (Some(ext), None) if validate_file_extension(ext) => Ok((stem, ext)),
        _ => Err(ToolsError::UnsupportedExtension(file_name.to_string())),
    }
}

/// Template names double as scaffold commands (`-<name>`), so they must not
/// shadow the built-in ones.
pub fn validate_template_name(name: &str, reserved: &[&str]) -> bool {
    TEMPLATE_NAME_CHARS.is_match(name) && !name.starts_with('-') && !reserved.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert!(validate_file_name("GameScene"));
        assert!(validate_file_name("imgui_tables-v2.1"));
        assert!(!validate_file_name(""));
        assert!(!validate_file_name("CON"));
        assert!(!validate_file_name("lpt3"));
        assert!(!validate_file_name(".hidden"));
        assert!(!validate_file_name("trailing."));
        assert!(!validate_file_name("with space"));
        assert!(!validate_file_name("semi;colon"));
        assert!(!validate_file_name(&"a".repeat(256)));
        assert!(validate_file_name(&"a".repeat(255)));
    }

    #[test]
    fn test_directory_names_follow_file_rules() {
        assert!(validate_directory_name("HexRune"));
        assert!(!validate_directory_name("aux"));
        assert!(!validate_directory_name(".git"));
    }

    #[test]
    fn test_extensions() {
        for ext in ["cpp", "H", "hlsli", "cs", "py"] {
            assert!(validate_file_extension(ext), "{ext}");
        }
        assert!(!validate_file_extension("exe"));
        assert!(!validate_file_extension(""));
        assert!(!validate_file_extension("c++"));
    }

    #[test]
    fn test_split_file_name() {
        assert_eq!(split_file_name("Node.h").unwrap(), ("Node", "h"));
        assert!(matches!(
            split_file_name("Node"),
            Err(ToolsError::UnsupportedExtension(_))
        ));
        assert!(matches!(
            split_file_name("Node.tar.gz"),
            Err(ToolsError::UnsupportedExtension(_))
        ));
        assert!(matches!(
            split_file_name("Node.exe"),
            Err(ToolsError::UnsupportedExtension(_))
        ));
        assert!(matches!(
            split_file_name("No de.h"),
            Err(ToolsError::InvalidName(_))
        ));
    }

    #[test]
    fn test_template_names() {
        assert!(validate_template_name("node", &["f", "u"]));
        assert!(!validate_template_name("f", &["f", "u"]));
        assert!(!validate_template_name("-f", &["f", "u"]));
        assert!(!validate_template_name("", &["f"]));
        assert!(!validate_template_name("two words", &["f"]));
    }
}
