//! Thin filesystem helpers: flat listing, recursive removal, zip extraction.
//!
//! Each fallible helper has a `Result` form; the boolean forms log the
//! failure and report plain success/failure.
use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Regular files directly inside `dir` (no recursion, no directories), as
/// absolute paths sorted by file name. Symlinks count when they point at a
/// file; entries that cannot be read (dangling links) are skipped.
pub fn files_in_directory(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }
    let root = std::path::absolute(dir).map_err(|e| Error::io(dir, e))?;

    let mut out = Vec::new();
    for entry in WalkDir::new(&root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!(%error, "skipping unreadable directory entry");
                continue;
            }
        };
        if entry.file_type().is_file() {
            out.push(entry.into_path());
        }
    }
    debug!(dir = %root.display(), files = out.len(), "listed directory");
    Ok(out)
}

/// Delete `dir` and everything below it, dotfiles included.
pub fn try_remove_dir_recursively(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }
    std::fs::remove_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    debug!(dir = %dir.display(), "removed directory tree");
    Ok(())
}

/// `false` if `dir` does not exist or anything inside could not be removed.
pub fn remove_dir_recursively(dir: impl AsRef<Path>) -> bool {
    match try_remove_dir_recursively(dir) {
        Ok(()) => true,
        Err(error) => {
            warn!(%error, "recursive removal failed");
            false
        }
    }
}

/// Extract every entry of the zip at `archive` below `dest`.
pub fn try_unzip(archive: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<()> {
    let archive = archive.as_ref();
    let dest = dest.as_ref();
    if dest.as_os_str().is_empty() {
        return Err(Error::EmptyDestination);
    }
    let file = File::open(archive).map_err(|e| Error::io(archive, e))?;
    let mut zip = zip::ZipArchive::new(file)?;
    std::fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;
    zip.extract(dest)?;
    debug!(archive = %archive.display(), dest = %dest.display(), entries = zip.len(), "extracted archive");
    Ok(())
}

pub fn unzip(archive: impl AsRef<Path>, dest: impl AsRef<Path>) -> bool {
    match try_unzip(archive, dest) {
        Ok(()) => true,
        Err(error) => {
            warn!(%error, "unzip failed");
            false
        }
    }
}
