use std::path::{MAIN_SEPARATOR_STR, Path};
use std::sync::LazyLock;

use regex::Regex;

static ABSOLUTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(?:[a-z]:)?[/\\]|[a-z][a-z0-9+.\-]*://)")
        .expect("absolute path pattern is valid")
});

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Splits on runs of separators, so `a//b` gives `["a", "b"]` while a leading
/// or trailing run still produces exactly one empty segment.
fn segments(path: &str) -> Vec<&str> {
    let pieces = path.split(is_separator).collect::<Vec<_>>();
    let last = pieces.len() - 1;

    pieces
        .into_iter()
        .enumerate()
        .filter(|(index, piece)| !piece.is_empty() || *index == 0 || *index == last)
        .map(|(_, piece)| piece)
        .collect()
}

/// Resolves `.` and `..` segments and canonicalizes separators without
/// touching the filesystem.
///
/// Leading `..` segments and the root marker of an absolute path are kept
/// as they are, so `../a` stays relative and `/..` stays `/..`.
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }

    let mut retained: Vec<&str> = Vec::new();
    for segment in segments(path) {
        match segment {
            "." => {}
            ".." if matches!(retained.last(), Some(last) if *last != ".." && !last.is_empty()) => {
                retained.pop();
            }
            _ => retained.push(segment),
        }
    }

    if retained == [""] {
        MAIN_SEPARATOR_STR.to_string()
    } else {
        retained.join(MAIN_SEPARATOR_STR)
    }
}

/// [`normalize`] for an OS path, going through its lossy UTF-8 form.
pub fn normalize_path(path: &Path) -> String {
    normalize(&path.to_string_lossy())
}

/// Joins the fragments with `/` and normalizes the result.
pub fn join<I, S>(paths: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = paths
        .into_iter()
        .map(|path| path.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("/");
    normalize(&joined)
}

/// True for `/x`, `\x`, `C:\x`, `c:/x` and `scheme://...` style paths.
pub fn is_absolute(path: &str) -> bool {
    ABSOLUTE_PATTERN.is_match(path)
}
