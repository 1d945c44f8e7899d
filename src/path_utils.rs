//! Path helpers shared by the config layer and the toggle core

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Validates that a path string is not empty or just whitespace
pub fn validate_path_str(path_str: &str) -> Result<(), String> {
    if path_str.trim().is_empty() {
        return Err("Path cannot be empty or contain only whitespace".to_string());
    }
    Ok(())
}

/// Parent directory to create before writing `path`, if it has one.
pub fn safe_parent_for_creation(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

/// The running executable's directory and its own file name.
pub fn program_location() -> io::Result<(PathBuf, OsString)> {
    let exe = std::env::current_exe()?;
    let name = exe
        .file_name()
        .map(|name| name.to_os_string())
        .ok_or_else(|| io::Error::other("executable path has no file name"))?;
    let dir = safe_parent_for_creation(&exe)
        .map(Path::to_path_buf)
        .ok_or_else(|| io::Error::other("executable path has no parent directory"))?;
    Ok((dir, name))
}

/// Lowercased extension with its leading dot, e.g. `.log`.
pub fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

/// File name for display, falling back to the whole path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
