use std::path::{Component, Path, PathBuf};

/// Lowercased extension of the last component. A `?query` suffix, as found on
/// URLs, is stripped before looking for the extension.
pub fn extension(path: &str) -> String {
    let without_query = path.split_once('?').map_or(path, |(head, _)| head);

    Path::new(without_query)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

pub fn base_name(path: &str) -> String {
    match Path::new(path).components().next_back() {
        Some(Component::Normal(name)) => name.to_string_lossy().into_owned(),
        Some(Component::ParentDir) => "..".to_string(),
        _ => String::new(),
    }
}

/// Last component without its extension.
pub fn file_stem(path: &str) -> String {
    let base = base_name(path);
    Path::new(&base)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or(base)
}

/// Parent of the path; `.` for a bare name, the path itself for a root.
pub fn dir_name(path: &str) -> String {
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().into_owned(),
        Some(_) => ".".to_string(),
        None if path.is_empty() => String::new(),
        None => path.to_string(),
    }
}

/// Canonical absolute path, or `None` when it cannot be resolved.
pub fn real(path: impl AsRef<Path>) -> Option<PathBuf> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return None;
    }
    path.canonicalize().ok()
}

pub fn is_file(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use tempfile::TempDir;

    #[rstest]
    #[case("photo.JPG", "jpg")]
    #[case("dir/archive.tar.gz", "gz")]
    #[case("https://cdn.example.com/img.PNG?v=3&x=y.txt", "png")]
    #[case("no_extension", "")]
    #[case("", "")]
    fn extension_is_lowercased_and_ignores_query(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(extension(input), expected);
    }

    #[rstest]
    #[case("a/b/c.txt", "c.txt")]
    #[case("a/b/", "b")]
    #[case("a/..", "..")]
    #[case("/", "")]
    fn base_name_returns_last_component(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(base_name(input), expected);
    }

    #[rstest]
    #[case("a/b/c.txt", "c")]
    #[case("archive.tar.gz", "archive.tar")]
    #[case("README", "README")]
    fn file_stem_drops_extension(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(file_stem(input), expected);
    }

    #[rstest]
    #[case("a/b/c.txt", "a/b")]
    #[case("file.txt", ".")]
    #[case("/", "/")]
    #[case("", "")]
    fn dir_name_returns_parent(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(dir_name(input), expected);
    }

    #[test]
    fn real_resolves_existing_paths_only() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested = temp_dir.path().join("nested");
        std::fs::create_dir(&nested).expect("Failed to create nested directory");

        let resolved = real(nested.join("..")).expect("Existing path should resolve");
        assert_eq!(
            resolved,
            temp_dir.path().canonicalize().expect("Failed to canonicalize")
        );
        assert!(real(temp_dir.path().join("missing")).is_none());
        assert!(real("").is_none());
    }

    #[test]
    fn is_file_rejects_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("file.txt");
        std::fs::write(&file, "content").expect("Failed to write file");

        assert!(is_file(&file));
        assert!(!is_file(temp_dir.path()));
        assert!(!is_file(temp_dir.path().join("missing.txt")));
    }
}
