use std::path::{Path, PathBuf};

use crate::path::normalize_path;

/// Renders a path the way error messages and logs show it: separators
/// canonicalized and `.`/`..` resolved, without touching the filesystem.
pub fn normalized_path_display(path: &Path) -> String {
    let normalized = normalize_path(path);
    if normalized.is_empty() {
        // `a/..` collapses to nothing; show the current directory instead
        ".".to_string()
    } else {
        normalized
    }
}

pub trait NormalizedPathExt {
    fn normalized_display(&self) -> String;
}

impl NormalizedPathExt for Path {
    fn normalized_display(&self) -> String {
        normalized_path_display(self)
    }
}

impl NormalizedPathExt for PathBuf {
    fn normalized_display(&self) -> String {
        normalized_path_display(self)
    }
}

impl NormalizedPathExt for &str {
    fn normalized_display(&self) -> String {
        normalized_path_display(Path::new(self))
    }
}

impl NormalizedPathExt for String {
    fn normalized_display(&self) -> String {
        normalized_path_display(Path::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::MAIN_SEPARATOR_STR;

    #[test]
    fn display_resolves_dot_segments() {
        let path = PathBuf::from("some/./dir/../file.txt");
        assert_eq!(
            path.normalized_display(),
            format!("some{MAIN_SEPARATOR_STR}file.txt")
        );
    }

    #[test]
    fn display_of_collapsed_path_is_current_dir() {
        assert_eq!("a/..".normalized_display(), ".");
    }
}
