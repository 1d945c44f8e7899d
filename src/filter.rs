use crate::config::ExclusionConfig;
use crate::marker::is_disabled_name;
use crate::path_utils::dotted_extension;
use std::ffi::OsStr;
use std::path::Path;

/// Why a path is kept out of the managed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Program,
    AlreadyDisabled,
    ExcludedFile,
    ExcludedExtension,
}

/// Decides membership of the managed set for an existing, non-directory path.
///
/// The rules are checked in order and the first hit wins:
/// the program's own file, names already carrying `.disabled`, paths the user
/// excluded one by one, then excluded extensions.
#[derive(Debug, Clone, Copy)]
pub struct Eligibility<'a> {
    program_name: &'a OsStr,
    config: &'a ExclusionConfig,
}

impl<'a> Eligibility<'a> {
    pub fn new(program_name: &'a OsStr, config: &'a ExclusionConfig) -> Self {
        Self {
            program_name,
            config,
        }
    }

    pub fn exclusion(&self, path: &Path) -> Option<Exclusion> {
        let name = path.file_name()?;
        if name == self.program_name {
            return Some(Exclusion::Program);
        }
        if is_disabled_name(name) {
            return Some(Exclusion::AlreadyDisabled);
        }
        if self.config.is_file_excluded(path) {
            return Some(Exclusion::ExcludedFile);
        }
        if let Some(ext) = dotted_extension(path)
            && self.config.is_extension_excluded(&ext)
        {
            return Some(Exclusion::ExcludedExtension);
        }
        None
    }

    pub fn should_include(&self, path: &Path) -> bool {
        path.file_name().is_some() && self.exclusion(path).is_none()
    }
}
