use crate::path_utils::display_name;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not a file: {}", path.display())]
    NotAFile { path: PathBuf },

    #[error("Invalid extension: {raw:?}")]
    InvalidExtension { raw: String },

    #[error("Target already exists: {}", path.display())]
    TargetExists { path: PathBuf },

    #[error("Failed to rename {} to {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config Load Error: {message}")]
    ConfigLoad { message: String },

    #[error("Config Save Error: {message}")]
    ConfigSave { message: String },

    #[error("Watch Error: {0}")]
    Watch(#[from] notify::Error),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parse Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Inquire Error: {0}")]
    Inquire(#[from] inquire::InquireError),
}

impl AppError {
    pub fn display_localized(&self) -> String {
        match self {
            AppError::NotAFile { path } => {
                t!("errors.not_a_file", path = path.display()).to_string()
            }
            AppError::InvalidExtension { raw } => {
                t!("errors.invalid_extension", raw = raw).to_string()
            }
            AppError::TargetExists { path } => {
                t!("errors.target_exists", path = path.display()).to_string()
            }
            AppError::Rename { from, source, .. } => t!(
                "errors.rename_failed",
                name = display_name(from),
                error = source
            )
            .to_string(),
            AppError::ConfigLoad { message } => {
                t!("errors.config_load", message = message).to_string()
            }
            AppError::ConfigSave { message } => {
                t!("errors.config_save", message = message).to_string()
            }
            _ => self.to_string(),
        }
    }

    /// The io error kind behind a failure, when there is one.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            AppError::Rename { source, .. } | AppError::Io(source) => Some(source.kind()),
            AppError::TargetExists { .. } => Some(std::io::ErrorKind::AlreadyExists),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
