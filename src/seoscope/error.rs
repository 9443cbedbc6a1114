use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid {kind} name: {name:?}")]
    InvalidName { kind: &'static str, name: String },

    #[error("Run {run_id} already exists in project {project}")]
    RunExists { project: String, run_id: String },

    #[error("No run {project}/{run_id} (start or import it first)")]
    RunNotFound { project: String, run_id: String },

    #[error("No summary built for {project}/{run_id} (run `summarize` first)")]
    SummaryNotFound { project: String, run_id: String },

    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(#[from] minijinja::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, SeoError>;
