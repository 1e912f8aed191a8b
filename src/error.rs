// Geopic Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeopicError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Server rejected request: {status} {body}")]
    ServerStatus { status: u16, body: String },

    #[error("Camera not ready")]
    CameraNotReady,

    #[error("No location fix available")]
    NoLocationFix,

    #[error("Server URL not configured")]
    ServerNotConfigured,

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Keychain error: {0}")]
    Keychain(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, GeopicError>;
