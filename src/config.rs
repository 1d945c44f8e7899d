use crate::error::{AppError, Result as AppResult};
use crate::path_utils::{safe_parent_for_creation, validate_path_str};
use anyhow::{Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_DIR: &str = "ALLDISABLE_CONFIG_DIR";
pub const ENV_LANG: &str = "ALLDISABLE_LANG";
pub const ENV_LOG: &str = "ALLDISABLE_LOG";
pub const APP_NAME: &str = "alldisable";
pub const APP_ORGANIZATION: &str = "TIME-TW";
pub const CONFIG_FILE: &str = "config.json";

/// Extensions listed (but not excluded) when no config file exists yet.
const DEFAULT_LISTED_EXTENSIONS: &[&str] = &[".txt", ".log", ".ini", ".config"];
/// The tool's own source and debug artifacts stay out of the list by default.
const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &[".rs", ".pdb"];
/// What survives a config file that cannot be parsed.
const FALLBACK_LISTED_EXTENSIONS: &[&str] = &[".txt", ".log", ".ini"];

pub fn resolve_config_dir(cli_override: Option<&Path>) -> Result<PathBuf> {
    let env_override = env::var(ENV_CONFIG_DIR).ok();
    resolve_config_dir_with(cli_override, env_override.as_deref())
}

/// CLI flag, then environment, then the platform config directory.
pub fn resolve_config_dir_with(
    cli_override: Option<&Path>,
    env_override: Option<&str>,
) -> Result<PathBuf> {
    if let Some(path) = cli_override {
        validate_path_str(&path.to_string_lossy())
            .map_err(|e| anyhow!(t!("errors.invalid_config_dir", error = e)))?;
        return Ok(path.to_path_buf());
    }

    if let Some(env_config_dir) = env_override {
        validate_path_str(env_config_dir)
            .map_err(|e| anyhow!(t!("errors.invalid_config_dir_env", error = e)))?;
        return Ok(PathBuf::from(env_config_dir));
    }

    let project_dirs = ProjectDirs::from("com", APP_ORGANIZATION, APP_NAME)
        .ok_or_else(|| anyhow!(t!("errors.not_find_config_dir")))?;
    Ok(project_dirs.config_dir().to_path_buf())
}

pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE)
}

/// Which files the tool leaves alone.
///
/// Persisted as JSON:
///
/// ```json
/// { "excluded_extensions": { ".log": true }, "excluded_files": ["/abs/path"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionConfig {
    pub excluded_extensions: BTreeMap<String, bool>,
    pub excluded_files: BTreeSet<PathBuf>,
}

/// Outcome of reading the config at startup. `warning` is set whenever the
/// file could not be used as-is and something else was loaded instead.
#[derive(Debug)]
pub struct ConfigLoad {
    pub config: ExclusionConfig,
    pub warning: Option<AppError>,
}

impl ExclusionConfig {
    pub fn defaults() -> Self {
        let mut excluded_extensions = BTreeMap::new();
        for ext in DEFAULT_LISTED_EXTENSIONS {
            excluded_extensions.insert((*ext).to_string(), false);
        }
        for ext in DEFAULT_EXCLUDED_EXTENSIONS {
            excluded_extensions.insert((*ext).to_string(), true);
        }
        Self {
            excluded_extensions,
            excluded_files: BTreeSet::new(),
        }
    }

    pub fn fallback() -> Self {
        Self {
            excluded_extensions: FALLBACK_LISTED_EXTENSIONS
                .iter()
                .map(|ext| ((*ext).to_string(), false))
                .collect(),
            excluded_files: BTreeSet::new(),
        }
    }

    /// Strict load: the file must exist and parse.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        let parsed: ExclusionConfig = serde_json::from_str(&content)?;
        Ok(parsed.normalized())
    }

    /// Startup load. A missing file is replaced by the defaults, which are
    /// written back straight away; a broken file yields the fallback set.
    pub fn load_or_init(path: &Path) -> ConfigLoad {
        match Self::load(path) {
            Ok(config) => ConfigLoad {
                config,
                warning: None,
            },
            Err(AppError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                let config = Self::defaults();
                let warning = config.save(path).err();
                if let Some(err) = &warning {
                    tracing::warn!(path = %path.display(), %err, "could not write default config");
                }
                ConfigLoad { config, warning }
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "config unreadable, using fallback");
                ConfigLoad {
                    config: Self::fallback(),
                    warning: Some(AppError::ConfigLoad {
                        message: err.to_string(),
                    }),
                }
            }
        }
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        let save_error = |err: &dyn std::fmt::Display| AppError::ConfigSave {
            message: format!("{}: {err}", path.display()),
        };

        if let Some(parent) = safe_parent_for_creation(path) {
            fs::create_dir_all(parent).map_err(|e| save_error(&e))?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|e| save_error(&e))?;
        fs::write(path, content).map_err(|e| save_error(&e))?;
        Ok(())
    }

    pub fn is_extension_excluded(&self, ext: &str) -> bool {
        self.excluded_extensions.get(ext).copied().unwrap_or(false)
    }

    pub fn is_file_excluded(&self, path: &Path) -> bool {
        self.excluded_files.contains(path)
    }

    /// Hand-edited keys such as `LOG` or ` .Ini` are folded to `.log`/`.ini`;
    /// unusable keys are dropped.
    fn normalized(self) -> Self {
        let mut excluded_extensions = BTreeMap::new();
        for (raw, excluded) in self.excluded_extensions {
            match normalize_extension(&raw) {
                Ok(ext) => {
                    let slot = excluded_extensions.entry(ext).or_insert(false);
                    *slot |= excluded;
                }
                Err(_) => tracing::warn!(key = %raw, "ignoring invalid extension key"),
            }
        }
        Self {
            excluded_extensions,
            excluded_files: self.excluded_files,
        }
    }
}

/// `" LOG "` -> `".log"`.
pub fn normalize_extension(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim().to_lowercase();
    let bare = trimmed.strip_prefix('.').unwrap_or(&trimmed);
    if bare.is_empty() || bare.contains(['/', '\\']) || bare.chars().any(char::is_whitespace) {
        return Err(AppError::InvalidExtension {
            raw: raw.to_string(),
        });
    }
    Ok(format!(".{bare}"))
}
