//! Recursive filesystem tree operations.
//!
//! The [`Walker`] produces a deterministic self-first view of a tree, on top
//! of which [`list`] and [`size`] are built. The mutating operations in
//! [`tree`] (copy, delete, rename, chmod, mkdir) use explicit work lists
//! instead of call recursion and report every OS failure as an [`FsError`].

pub mod bytes;
mod entry;
mod error;
mod natural;
pub mod tree;
mod walker;

pub use entry::{DirectoryEntry, EntryKind};
pub use error::FsError;
pub use natural::natural_cmp;
pub use tree::{
    DEFAULT_DIR_MODE, DEFAULT_FILE_MODE, copy, create_dir, delete, make_writable, read,
    read_string, rename, try_remove_dir, try_unlink, write,
};
pub use walker::{Walker, list, size};
