//! Error types for loading, configuring, rendering, and exporting.

use thiserror::Error;

use crate::document::DocumentKind;
use crate::export::{ExportEvent, ExportState};

/// A word record handed over by the storage side is unusable.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("word #{index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("duplicate word id `{0}`")]
    DuplicateId(String),

    #[error("word list is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Failure inside a [`Renderer`](crate::render::Renderer).
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("layout error: {0}")]
    Layout(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<taffy::TaffyError> for RenderError {
    fn from(error: taffy::TaffyError) -> Self {
        RenderError::Layout(error.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("an export of the {0} document is already in progress")]
    Busy(DocumentKind),

    #[error("invalid export transition: {event:?} while {from:?}")]
    InvalidTransition { from: ExportState, event: ExportEvent },

    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("render task aborted: {0}")]
    Join(String),
}

impl From<tokio::task::JoinError> for ExportError {
    fn from(error: tokio::task::JoinError) -> Self {
        ExportError::Join(error.to_string())
    }
}
