//! The `.disabled` name marker.
//!
//! Whether a file is active or disabled is read off its current name every
//! time it is needed; nothing else records it.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

pub const DISABLED_SUFFIX: &str = ".disabled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Active,
    Disabled,
}

impl FileState {
    pub fn of(path: &Path) -> Self {
        match path.file_name() {
            Some(name) if is_disabled_name(name) => FileState::Disabled,
            _ => FileState::Active,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FileState::Active => FileState::Disabled,
            FileState::Disabled => FileState::Active,
        }
    }
}

/// Any name ending in the marker is disabled, including a bare `.disabled`.
pub fn is_disabled_name(name: &OsStr) -> bool {
    name.as_encoded_bytes().ends_with(DISABLED_SUFFIX.as_bytes())
}

/// `a.txt` -> `a.txt.disabled`, in the same directory.
pub fn disabled_path(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?;
    let mut disabled = OsString::from(name);
    disabled.push(DISABLED_SUFFIX);
    Some(path.with_file_name(disabled))
}

/// `a.txt.disabled` -> `a.txt`.
///
/// `None` if the name carries no marker or nothing precedes it.
pub fn enabled_path(path: &Path) -> Option<PathBuf> {
    let stem = strip_marker(path.file_name()?)?;
    if stem.is_empty() {
        return None;
    }
    Some(path.with_file_name(stem))
}

fn strip_marker(name: &OsStr) -> Option<OsString> {
    if let Some(name) = name.to_str() {
        return name.strip_suffix(DISABLED_SUFFIX).map(OsString::from);
    }
    strip_marker_raw(name)
}

#[cfg(unix)]
fn strip_marker_raw(name: &OsStr) -> Option<OsString> {
    use std::os::unix::ffi::OsStrExt;
    name.as_bytes()
        .strip_suffix(DISABLED_SUFFIX.as_bytes())
        .map(|stem| OsStr::from_bytes(stem).to_os_string())
}

// non-unicode names elsewhere cannot be split without reinterpreting bytes
#[cfg(not(unix))]
fn strip_marker_raw(_name: &OsStr) -> Option<OsString> {
    None
}

/// Where `path` goes when its state is flipped.
pub fn toggled_path(path: &Path) -> Option<PathBuf> {
    match FileState::of(path) {
        FileState::Active => disabled_path(path),
        FileState::Disabled => enabled_path(path),
    }
}
