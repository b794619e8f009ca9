//! Error types shared by the library modules

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, rendering or resolving blog content
#[derive(Error, Debug)]
pub enum BlogError {
    #[error("No post found for slug: {slug}")]
    NotFound { slug: String },

    #[error("Missing front-matter field `{field}` in {path:?}")]
    MissingMetadata { path: PathBuf, field: &'static str },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Markup error: {0}")]
    Markup(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BlogError {
    /// Whether this error means the requested post does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, BlogError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, BlogError>;
