use std::fs::{self, DirBuilder, File};
use std::io;
use std::path::{Path, PathBuf};

use snafu::{ResultExt, ensure};
use tracing::{debug, warn};

use crate::ext::NormalizedPathExt;
use crate::filesystem::entry::EntryKind;
use crate::filesystem::error::{
    AlreadyExistsSnafu, ChmodFailedSnafu, CopyFailedSnafu, DeleteFailedSnafu, FsError,
    InvalidInputSnafu, MkdirFailedSnafu, NotFoundSnafu, ReadFailedSnafu, RenameFailedSnafu,
    WriteFailedSnafu,
};
use crate::filesystem::walker::Walker;
use crate::path::normalize_path;

pub const DEFAULT_DIR_MODE: u32 = 0o777;
pub const DEFAULT_FILE_MODE: u32 = 0o666;

/// Work item of the post-order traversals: a directory is visited (its
/// children scheduled) and later finished once all of them are done.
enum Pending {
    Visit(PathBuf),
    Finish(PathBuf),
}

/// Creates `dir` and its missing parents. Succeeds when the directory already
/// exists, including when another process created it while we were trying.
pub fn create_dir(dir: impl AsRef<Path>, mode: u32) -> Result<(), FsError> {
    let dir = dir.as_ref();
    if dir.is_dir() {
        return Ok(());
    }

    debug!("Creating directory {} ({:o})", dir.normalized_display(), mode);
    match dir_builder(mode).create(dir) {
        Ok(()) => Ok(()),
        Err(_) if dir.is_dir() => {
            debug!("Directory {} appeared concurrently", dir.normalized_display());
            Ok(())
        }
        Err(source) => Err(source).context(MkdirFailedSnafu { path: dir, mode }),
    }
}

fn dir_builder(mode: u32) -> DirBuilder {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder
}

fn ensure_parent(path: &Path) -> Result<(), FsError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir(parent, DEFAULT_DIR_MODE),
        _ => Ok(()),
    }
}

/// Copies a file or a whole directory tree.
///
/// Copying a directory makes `target` mirror `origin`: **every entry already
/// inside `target` is deleted first**, then the tree is recreated self-first.
/// With `overwrite == false` an existing `target` is an error instead.
pub fn copy(
    origin: impl AsRef<Path>,
    target: impl AsRef<Path>,
    overwrite: bool,
) -> Result<(), FsError> {
    let (origin, target) = (origin.as_ref(), target.as_ref());
    ensure!(origin.exists(), NotFoundSnafu { path: origin });
    ensure!(
        overwrite || !target.exists(),
        AlreadyExistsSnafu { path: target }
    );

    if origin.is_dir() {
        copy_dir(origin, target)
    } else {
        ensure!(
            resolve(origin) != resolve(target),
            InvalidInputSnafu {
                path: target,
                reason: "cannot copy a file onto itself",
            }
        );
        copy_file(origin, target)
    }
}

fn copy_dir(origin: &Path, target: &Path) -> Result<(), FsError> {
    let (resolved_origin, resolved_target) = (resolve(origin), resolve(target));
    ensure!(
        !resolved_target.starts_with(&resolved_origin),
        InvalidInputSnafu {
            path: target,
            reason: format!(
                "cannot copy directory '{}' into itself",
                origin.normalized_display()
            ),
        }
    );
    // Clearing the target would delete an origin living below it
    ensure!(
        !resolved_origin.starts_with(&resolved_target),
        InvalidInputSnafu {
            path: target,
            reason: format!(
                "cannot copy directory '{}' onto one of its parents",
                origin.normalized_display()
            ),
        }
    );

    create_dir(target, DEFAULT_DIR_MODE)?;
    for child in read_children(target).context(ReadFailedSnafu { path: target })? {
        delete(&child)?;
    }

    debug!(
        "Copying tree {} to {}",
        origin.normalized_display(),
        target.normalized_display()
    );
    for entry in Walker::new(origin) {
        let entry = entry?;
        let destination = target.join(&entry.sub_path);
        let is_dir = match entry.kind {
            EntryKind::Directory => true,
            EntryKind::Symlink => entry.path.is_dir(),
            EntryKind::File => false,
        };

        if is_dir {
            create_dir(&destination, DEFAULT_DIR_MODE)?;
        } else {
            copy_file(&entry.path, &destination)?;
        }
    }

    Ok(())
}

fn copy_file(origin: &Path, target: &Path) -> Result<(), FsError> {
    ensure_parent(target)?;

    let mut reader = File::open(origin).context(CopyFailedSnafu { origin, target })?;
    let mut writer = File::create(target).context(CopyFailedSnafu { origin, target })?;
    let copied =
        io::copy(&mut reader, &mut writer).context(CopyFailedSnafu { origin, target })?;

    debug!(
        "Copied {} bytes from {} to {}",
        copied,
        origin.normalized_display(),
        target.normalized_display()
    );
    Ok(())
}

/// Removes a file, a symbolic link or a whole directory tree. A path that does
/// not exist is not an error.
pub fn delete(path: impl AsRef<Path>) -> Result<(), FsError> {
    let path = path.as_ref();
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            debug!("Nothing to delete at {}", path.normalized_display());
            return Ok(());
        }
        Err(source) => return Err(source).context(DeleteFailedSnafu { path }),
    };

    if !metadata.is_dir() {
        return remove_link_or_file(path);
    }

    debug!("Deleting tree {}", path.normalized_display());
    let mut pending = vec![Pending::Visit(path.to_path_buf())];
    while let Some(next) = pending.pop() {
        match next {
            Pending::Visit(dir) => {
                let children = read_children(&dir).context(DeleteFailedSnafu { path: &dir })?;
                pending.push(Pending::Finish(dir));

                for child in children {
                    let metadata =
                        fs::symlink_metadata(&child).context(DeleteFailedSnafu { path: &child })?;
                    if metadata.is_dir() {
                        pending.push(Pending::Visit(child));
                    } else {
                        remove_link_or_file(&child)?;
                    }
                }
            }
            Pending::Finish(dir) => {
                fs::remove_dir(&dir).context(DeleteFailedSnafu { path: &dir })?;
            }
        }
    }

    Ok(())
}

fn remove_link_or_file(path: &Path) -> Result<(), FsError> {
    // Windows symlinks to directories must go through the directory call
    let result = if cfg!(windows) && path.is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    };
    result.context(DeleteFailedSnafu { path })
}

/// Moves `origin` to `target`, creating the target's parent as needed.
///
/// When both sides are non-directories the platform rename replaces the target
/// atomically. Otherwise an existing target is deleted first, which leaves a
/// window where neither path exists.
pub fn rename(
    origin: impl AsRef<Path>,
    target: impl AsRef<Path>,
    overwrite: bool,
) -> Result<(), FsError> {
    let (origin, target) = (origin.as_ref(), target.as_ref());
    ensure!(
        overwrite || !target.exists(),
        AlreadyExistsSnafu { path: target }
    );
    ensure!(origin.exists(), NotFoundSnafu { path: origin });

    ensure_parent(target)?;
    let target_is_dir = fs::symlink_metadata(target)
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false);
    if (origin.is_dir() || target_is_dir) && resolve(origin) != resolve(target) {
        delete(target)?;
    }

    debug!(
        "Renaming {} to {}",
        origin.normalized_display(),
        target.normalized_display()
    );
    fs::rename(origin, target).context(RenameFailedSnafu { origin, target })
}

/// Applies `file_mode` to every file and `dir_mode` to every directory of the
/// tree rooted at `path`, children before their parent.
///
/// Symbolic links below the root are chmod'ed through but not descended into.
pub fn make_writable(path: impl AsRef<Path>, dir_mode: u32, file_mode: u32) -> Result<(), FsError> {
    let root = path.as_ref();
    let mut pending = vec![Pending::Visit(root.to_path_buf())];

    while let Some(next) = pending.pop() {
        match next {
            Pending::Visit(path) => {
                let Ok(metadata) = fs::metadata(&path) else {
                    return NotFoundSnafu { path }.fail();
                };

                if metadata.is_file() {
                    chmod(&path, file_mode)?;
                } else if metadata.is_dir() {
                    let children = if path == root || !path.is_symlink() {
                        read_children(&path).context(ReadFailedSnafu { path: &path })?
                    } else {
                        Vec::new()
                    };
                    pending.push(Pending::Finish(path));
                    pending.extend(children.into_iter().map(Pending::Visit));
                } else {
                    return NotFoundSnafu { path }.fail();
                }
            }
            Pending::Finish(dir) => chmod(&dir, dir_mode)?,
        }
    }

    Ok(())
}

fn chmod(path: &Path, mode: u32) -> Result<(), FsError> {
    debug!("Setting mode {:o} on {}", mode, path.normalized_display());
    set_mode(path, mode).context(ChmodFailedSnafu { path, mode })
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_readonly(mode & 0o222 == 0);
    fs::set_permissions(path, permissions)
}

pub fn read(file: impl AsRef<Path>) -> Result<Vec<u8>, FsError> {
    let file = file.as_ref();
    fs::read(file).context(ReadFailedSnafu { path: file })
}

pub fn read_string(file: impl AsRef<Path>) -> Result<String, FsError> {
    let file = file.as_ref();
    fs::read_to_string(file).context(ReadFailedSnafu { path: file })
}

/// Writes `content` to `file`, creating parent directories, and optionally
/// applies `mode` afterwards.
pub fn write(
    file: impl AsRef<Path>,
    content: impl AsRef<[u8]>,
    mode: Option<u32>,
) -> Result<(), FsError> {
    let file = file.as_ref();
    ensure_parent(file)?;
    fs::write(file, content).context(WriteFailedSnafu { path: file })?;

    if let Some(mode) = mode {
        chmod(file, mode)?;
    }
    Ok(())
}

/// Best-effort recursive removal that never fails.
///
/// Returns `false` only when `dir` is not a directory. Nested directories are
/// always emptied and removed (symbolic links to them are not followed).
/// `unlink_files` only decides whether the non-directory entries directly
/// inside `dir` are removed; when they stay, so does `dir`.
pub fn try_remove_dir(dir: impl AsRef<Path>, unlink_files: bool) -> bool {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return false;
    }

    let mut pending = vec![Pending::Visit(dir.to_path_buf())];
    while let Some(next) = pending.pop() {
        match next {
            Pending::Visit(current) => {
                let children = read_children(&current).unwrap_or_else(|error| {
                    warn!("Cannot list {}: {}", current.normalized_display(), error);
                    Vec::new()
                });
                let unlink = unlink_files || current != dir;
                pending.push(Pending::Finish(current));

                for child in children {
                    let metadata = fs::symlink_metadata(&child);
                    if metadata.as_ref().is_ok_and(|metadata| metadata.is_dir()) {
                        pending.push(Pending::Visit(child));
                    } else if unlink {
                        try_unlink_entry(&child);
                    }
                }
            }
            Pending::Finish(current) => {
                if let Err(error) = fs::remove_dir(&current) {
                    debug!("Leaving {} in place: {}", current.normalized_display(), error);
                }
            }
        }
    }

    true
}

/// Removes a regular file, reporting success instead of failing.
pub fn try_unlink(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    if !path.is_file() {
        return false;
    }

    match fs::remove_file(path) {
        Ok(()) => true,
        Err(error) => {
            warn!("Cannot unlink {}: {}", path.normalized_display(), error);
            false
        }
    }
}

/// Removes a non-directory entry, symbolic links included.
fn try_unlink_entry(path: &Path) {
    if let Err(error) = fs::remove_file(path) {
        warn!("Cannot unlink {}: {}", path.normalized_display(), error);
    }
}

/// Immediate children of `dir`, unsorted.
fn read_children(dir: &Path) -> io::Result<Vec<PathBuf>> {
    fs::read_dir(dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect()
}

/// Best resolution of where `path` lives: the canonical path when it exists,
/// otherwise the canonical parent joined with the final name, falling back to
/// a lexically normalized absolute path.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) => Path::new("."),
        None => return lexical_absolute(path),
    };
    match (parent.canonicalize(), path.file_name()) {
        (Ok(parent), Some(name)) => parent.join(name),
        _ => lexical_absolute(path),
    }
}

fn lexical_absolute(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    PathBuf::from(normalize_path(&absolute))
}
