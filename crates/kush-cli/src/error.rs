#![forbid(unsafe_code)]

use std::path::PathBuf;

use kush_core::{ExtractError, StorageError};
use kush_runtime::ConfigError;
use kush_web::InputParseError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("cannot read page snapshot {path}: {source}")]
    Page {
        path: PathBuf,
        #[source]
        source: ExtractError,
    },

    #[error("{path}:{line}: {source}")]
    Event {
        path: PathBuf,
        line: usize,
        #[source]
        source: InputParseError,
    },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("{message}")]
    Exit { code: i32, message: String },
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exit { code, .. } => *code,
            Self::InvalidArgument { .. } | Self::Config(_) => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn exit(code: i32, message: impl Into<String>) -> Self {
        Self::Exit {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
