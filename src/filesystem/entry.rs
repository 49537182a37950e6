use std::fs::FileType;
use std::path::PathBuf;

use derive_more::Display;

/// Kind of a filesystem node as seen without following symbolic links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EntryKind {
    #[display("file")]
    File,
    #[display("directory")]
    Directory,
    #[display("symlink")]
    Symlink,
}

impl From<FileType> for EntryKind {
    fn from(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else {
            // Sockets, fifos and devices are treated like files
            EntryKind::File
        }
    }
}

/// A node produced by a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Walk root joined with `sub_path`.
    pub path: PathBuf,
    /// Path relative to the walk root.
    pub sub_path: PathBuf,
    pub kind: EntryKind,
    /// Byte length for files, 0 for everything else.
    pub size: u64,
}
