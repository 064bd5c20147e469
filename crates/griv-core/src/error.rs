//! Error types for griv

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Grievance not found: {0}")]
    NotFound(String),

    #[error("Grievance already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid submission: {0}")]
    Validation(String),

    #[error("Unknown ward: {0}")]
    UnknownWard(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    #[error("Store not initialized. Run 'griv init' first.")]
    NotInitialized,

    #[error("Store already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
