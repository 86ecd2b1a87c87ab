//! Filesystem helpers built on `cap-std` and `camino`.
//!
//! Shared with the command-line crate for validating input paths.

use std::io;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open an existing file for reading using ambient authority.
///
/// # Errors
///
/// Propagates the I/O error from opening the file.
pub fn open_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Report whether `path` exists and is a regular file.
///
/// # Errors
///
/// Propagates I/O failures, including `NotFound` when the path or its
/// parent directory is missing.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} has no file name")))?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.metadata(name).map(|meta| meta.is_file())
}

/// Create every missing directory above `path`.
///
/// Relative parents are resolved against the current directory first, so
/// `..` components may climb above it. The directories are then created
/// from the filesystem root.
///
/// # Errors
///
/// Propagates the I/O error from reading the current directory, opening a
/// directory, or creating one.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let absolute = if parent.is_absolute() {
        parent.to_path_buf()
    } else {
        current_dir()?.join(parent)
    };
    let relative = below_root(&absolute);
    if relative.as_str().is_empty() {
        return Ok(());
    }
    let root = fs_utf8::Dir::open_ambient_dir("/", ambient_authority())?;
    root.create_dir_all(relative)
}

/// Components of an absolute path below `/`, with `.` and `..` folded away.
fn below_root(absolute: &Utf8Path) -> Utf8PathBuf {
    let mut relative = Utf8PathBuf::new();
    for component in absolute.components() {
        match component {
            Utf8Component::Normal(name) => relative.push(name),
            Utf8Component::ParentDir => {
                relative.pop();
            }
            Utf8Component::Prefix(_) | Utf8Component::RootDir | Utf8Component::CurDir => {}
        }
    }
    relative
}

fn current_dir() -> io::Result<Utf8PathBuf> {
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::from_path_buf(cwd)
        .map_err(|cwd| io::Error::other(format!("current directory {} is not UTF-8", cwd.display())))
}
