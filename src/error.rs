use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StageGraphError {
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("json parse error in {source_name}: {source}")]
    JsonParse {
        source_name: String,
        source: serde_json::Error,
    },

    #[error("config parse error in {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("request to {url} failed: {source}")]
    Fetch { url: String, source: reqwest::Error },
}

pub type Result<T> = std::result::Result<T, StageGraphError>;
