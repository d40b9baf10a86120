//! Writing the service file to disk.
//!
//! Responsibilities:
//! - Replace the whole file atomically (temp file + rename).
//! - Recover once from a read-only file by adding write permission.
//!
//! Does NOT handle:
//! - Producing the file text (see `format`).
//! - Deciding what to write (see `store`).
//!
//! Invariants:
//! - A failed write never truncates or corrupts the existing file.
//! - A file whose permission bits are read-only is refused, whoever runs the process.
//! - Permission escalation is attempted at most once per save.
//! - When recovery fails, the original permission error is returned.
//! - A symlinked service file stays a symlink; the file it points to is replaced.

use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::constants::TEMP_FILE_SUFFIX;
use crate::error::{Result, ServiceError};

/// Saves `content` to `path`, escalating write permission once if the file is read-only.
pub(crate) fn save_with_permission_recovery(path: &Path, content: &str) -> Result<()> {
    let target = write_target(path).map_err(|e| ServiceError::from_io(path, e))?;
    if target.as_path() != path {
        tracing::debug!(
            path = %path.display(),
            target = %target.display(),
            "Service file is a symlink, writing to its target"
        );
    }

    let original = match atomic_write(&target, content) {
        Ok(()) => return Ok(()),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => e,
        Err(e) => return Err(ServiceError::from_io(path, e)),
    };

    tracing::warn!(
        path = %path.display(),
        error = %original,
        "Service file is not writable, adding write permission"
    );

    if let Err(e) = make_writable(&target) {
        tracing::warn!(
            path = %path.display(),
            error = %e,
            "Could not add write permission to service file"
        );
        return Err(ServiceError::PermissionDenied {
            path: path.to_path_buf(),
            source: original,
        });
    }

    match atomic_write(&target, content) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "Service file saved after permission change");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Service file still not writable after permission change"
            );
            Err(ServiceError::PermissionDenied {
                path: path.to_path_buf(),
                source: original,
            })
        }
    }
}

/// The file the rename must replace: `path` itself, or the end of its symlink chain.
///
/// A dangling symlink is replaced by a regular file.
fn write_target(path: &Path) -> std::io::Result<PathBuf> {
    match std::fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_symlink() => match std::fs::canonicalize(path) {
            Ok(target) => Ok(target),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(path.to_path_buf()),
            Err(e) => Err(e),
        },
        Ok(_) => Ok(path.to_path_buf()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e),
    }
}

/// Writes to a sibling temp file, then renames it over `path`.
///
/// The temp file takes over the target's permissions so a rewrite does not
/// change the file mode.
fn atomic_write(path: &Path, content: &str) -> std::io::Result<()> {
    let existing = match std::fs::metadata(path) {
        Ok(metadata) => Some(metadata),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => return Err(e),
    };

    if let Some(metadata) = &existing
        && metadata.permissions().readonly()
    {
        return Err(std::io::Error::new(
            ErrorKind::PermissionDenied,
            "service file is read-only",
        ));
    }

    let temp_path = temp_path_for(path);
    let result = write_temp(&temp_path, content)
        .and_then(|()| match &existing {
            Some(metadata) => std::fs::set_permissions(&temp_path, metadata.permissions()),
            None => Ok(()),
        })
        .and_then(|()| std::fs::rename(&temp_path, path));

    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }
    result?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "Service file saved atomically");
    Ok(())
}

fn write_temp(temp_path: &Path, content: &str) -> std::io::Result<()> {
    let mut file = File::create(temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(TEMP_FILE_SUFFIX);
    path.with_file_name(name)
}

/// Adds write permission for owner, group and other.
#[cfg(unix)]
fn make_writable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    use crate::constants::WRITE_ALL_MODE;

    let mut permissions = std::fs::metadata(path)?.permissions();
    permissions.set_mode((permissions.mode() & 0o7777) | WRITE_ALL_MODE);
    std::fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn make_writable(path: &Path) -> std::io::Result<()> {
    let mut permissions = std::fs::metadata(path)?.permissions();
    permissions.set_readonly(false);
    std::fs::set_permissions(path, permissions)
}
