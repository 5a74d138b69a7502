use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DirlintError>;

#[derive(Error, Debug)]
pub enum DirlintError {
    #[error("Cannot enumerate root directory {}: {source}", root.display())]
    Enumerate {
        root: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl DirlintError {
    pub fn exit_code(&self) -> i32 {
        2
    }
}
