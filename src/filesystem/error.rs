use std::path::PathBuf;

use snafu::Snafu;

use crate::ext::NormalizedPathExt;

/// Every tree operation fails with one of these; OS failures keep the
/// underlying `io::Error` as their source.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FsError {
    #[snafu(display("Invalid argument '{}': {}", path.normalized_display(), reason))]
    InvalidInput { path: PathBuf, reason: String },

    #[snafu(display("File or directory '{}' not found", path.normalized_display()))]
    NotFound { path: PathBuf },

    #[snafu(display("File or directory '{}' already exists", path.normalized_display()))]
    AlreadyExists { path: PathBuf },

    #[snafu(display(
        "Unable to copy file '{}' to '{}': {}",
        origin.normalized_display(),
        target.normalized_display(),
        source
    ))]
    CopyFailed {
        origin: PathBuf,
        target: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Unable to delete '{}': {}", path.normalized_display(), source))]
    DeleteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display(
        "Unable to rename '{}' to '{}': {}",
        origin.normalized_display(),
        target.normalized_display(),
        source
    ))]
    RenameFailed {
        origin: PathBuf,
        target: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display(
        "Unable to chmod '{}' to mode {:o}: {}",
        path.normalized_display(),
        mode,
        source
    ))]
    ChmodFailed {
        path: PathBuf,
        mode: u32,
        source: std::io::Error,
    },

    #[snafu(display(
        "Unable to create directory '{}' with mode {:o}: {}",
        path.normalized_display(),
        mode,
        source
    ))]
    MkdirFailed {
        path: PathBuf,
        mode: u32,
        source: std::io::Error,
    },

    #[snafu(display("Unable to read '{}': {}", path.normalized_display(), source))]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Unable to write file '{}': {}", path.normalized_display(), source))]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn messages_name_normalized_paths() {
        let error = FsError::DeleteFailed {
            path: PathBuf::from("/tmp/./work/../victim"),
            source: Error::new(ErrorKind::PermissionDenied, "permission denied"),
        };
        let message = error.to_string();

        assert!(message.contains("Unable to delete"));
        assert!(message.contains(&"/tmp/victim".normalized_display()));
        assert!(message.contains("permission denied"));
    }

    #[test]
    fn chmod_message_shows_octal_mode() {
        let error = FsError::ChmodFailed {
            path: PathBuf::from("file.txt"),
            mode: 0o644,
            source: Error::new(ErrorKind::Other, "boom"),
        };

        assert!(error.to_string().contains("mode 644"));
    }

    #[test]
    fn copy_message_names_both_paths() {
        let error = FsError::CopyFailed {
            origin: PathBuf::from("from.txt"),
            target: PathBuf::from("to.txt"),
            source: Error::new(ErrorKind::Other, "disk full"),
        };
        let message = error.to_string();

        assert!(message.contains("from.txt"));
        assert!(message.contains("to.txt"));
        assert!(message.contains("disk full"));
    }
}
