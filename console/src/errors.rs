//! Error types for the deployment console

use thiserror::Error;

/// Main error type for the deployment console
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocketError(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Decode error: {0}")]
    DecodeError(#[from] DecodeError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure to turn one inbound stream frame into a log entry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("message has no entry_type")]
    MissingEntryType,

    #[error("unknown entry_type {0:?}")]
    UnknownEntryType(String),
}
