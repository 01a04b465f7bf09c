use std::path::{Path, PathBuf};

/// Expands a leading `~` in a path to the user's home directory.
/// Also normalizes path separators for the current OS.
pub fn expand_tilde(path: &str) -> String {
    let result = if path.starts_with("~/") || path == "~" {
        if let Some(home) = dirs::home_dir() {
            let rest = &path[1..];
            home.join(rest.trim_start_matches('/'))
                .to_string_lossy()
                .to_string()
        } else {
            path.to_string()
        }
    } else {
        path.to_string()
    };
    if cfg!(windows) {
        result.replace('/', "\\")
    } else {
        result
    }
}

/// Replaces backslashes with forward slashes. Build-list entries and user
/// input are always handled in `/` form.
pub fn forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Joins `relative` onto `base` unless it is already absolute.
pub fn resolve(base: &Path, relative: &str) -> PathBuf {
    let expanded = PathBuf::from(expand_tilde(relative));
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_slashes() {
        assert_eq!(forward_slashes(r"Core\Math\Vector.h"), "Core/Math/Vector.h");
        assert_eq!(forward_slashes("Core/Vector.h"), "Core/Vector.h");
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let base = Path::new("/repo");
        assert_eq!(resolve(base, "Source"), PathBuf::from("/repo/Source"));
        #[cfg(unix)]
        assert_eq!(resolve(base, "/opt/x"), PathBuf::from("/opt/x"));
    }

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        if cfg!(windows) {
            return;
        }
        assert_eq!(expand_tilde("Source/Core"), "Source/Core");
    }
}
