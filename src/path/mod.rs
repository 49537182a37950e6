//! Path string helpers.
//!
//! Nothing in here touches the filesystem except [`real`] and [`is_file`];
//! normalization is a pure string transformation that accepts both `/` and
//! `\` and emits the platform separator.

mod components;
mod normalizer;

pub use components::{base_name, dir_name, extension, file_stem, is_file, real};
pub use normalizer::{is_absolute, join, normalize, normalize_path};
