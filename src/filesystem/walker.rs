use std::io;
use std::path::{Path, PathBuf};

use snafu::{ResultExt, ensure};
use tracing::debug;
use walkdir::WalkDir;

use crate::ext::NormalizedPathExt;
use crate::filesystem::entry::{DirectoryEntry, EntryKind};
use crate::filesystem::error::{FsError, InvalidInputSnafu, ReadFailedSnafu};
use crate::filesystem::natural::natural_cmp;

/// Depth-first, self-first walk over everything below `root`.
///
/// A directory is yielded before its descendants and siblings come out in
/// natural order of their names. Symbolic links are reported but never
/// followed. When a directory cannot be read the walk yields one
/// [`FsError::ReadFailed`] and carries on with whatever is still pending.
pub struct Walker {
    root: PathBuf,
    inner: walkdir::IntoIter,
}

impl Walker {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let inner = WalkDir::new(&root)
            .min_depth(1)
            .follow_links(false)
            .sort_by(|a, b| {
                natural_cmp(
                    &a.file_name().to_string_lossy(),
                    &b.file_name().to_string_lossy(),
                )
            })
            .into_iter();

        Self { root, inner }
    }

    fn to_entry(&self, entry: walkdir::DirEntry) -> Result<DirectoryEntry, FsError> {
        let kind = EntryKind::from(entry.file_type());
        let size = match kind {
            EntryKind::File => entry
                .metadata()
                .map_err(io::Error::from)
                .context(ReadFailedSnafu { path: entry.path() })?
                .len(),
            _ => 0,
        };
        let sub_path = entry
            .path()
            .strip_prefix(&self.root)
            .unwrap_or(entry.path())
            .to_path_buf();

        Ok(DirectoryEntry {
            path: entry.into_path(),
            sub_path,
            kind,
            size,
        })
    }

    fn to_error(&self, error: walkdir::Error) -> FsError {
        let path = error.path().unwrap_or(&self.root).to_path_buf();
        FsError::ReadFailed {
            path,
            source: io::Error::from(error),
        }
    }
}

impl Iterator for Walker {
    type Item = Result<DirectoryEntry, FsError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next()? {
            Ok(entry) => Some(self.to_entry(entry)),
            Err(error) => Some(Err(self.to_error(error))),
        }
    }
}

/// Paths of every file and directory below `dir`, in natural order of the
/// full path strings.
pub fn list(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, FsError> {
    let dir = dir.as_ref();
    ensure!(
        dir.is_dir(),
        InvalidInputSnafu {
            path: dir,
            reason: "the path must be an existing directory",
        }
    );

    let mut contents = Walker::new(dir)
        .map(|entry| entry.map(|entry| entry.path))
        .collect::<Result<Vec<_>, _>>()?;

    if !contents.is_empty() {
        contents.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
    }
    debug!("Listed {} entries under {}", contents.len(), dir.normalized_display());

    Ok(contents)
}

/// Total byte length of the regular files below `dir`.
///
/// Unlike [`list`] this never fails: a missing root or an unreadable subtree
/// simply contributes nothing.
pub fn size(dir: impl AsRef<Path>) -> u64 {
    Walker::new(dir.as_ref())
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                debug!("Skipping unreadable entry while sizing: {}", error);
                None
            }
        })
        .filter(|entry| entry.kind == EntryKind::File)
        .map(|entry| entry.size)
        .sum()
}
