use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Data directory not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("No title list files matching {prefix}*{suffix} in {dir}")]
    NoInputFiles {
        dir: PathBuf,
        prefix: String,
        suffix: String,
    },

    #[error("Failed to scan {path}: {reason}")]
    Scan { path: PathBuf, reason: String },

    #[error("Failed to read input: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to write {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize hierarchy: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to render config template: {0}")]
    ConfigTemplate(#[from] toml::ser::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
