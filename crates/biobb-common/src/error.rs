use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BiobbError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input file missing or empty: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Name already staged in the sandbox: {0}")]
    DuplicateStage(String),

    #[error("Tool binary not found: {0}")]
    BinaryNotFound(String),

    #[error("{tool} exited with code {code}: {stderr}")]
    ToolFailure {
        tool: String,
        code: i32,
        stderr: String,
    },

    #[error("Expected output was not produced: {0}")]
    MissingOutput(String),

    #[error("Malformed table {}: {reason}", .path.display())]
    Table { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BiobbError>;
