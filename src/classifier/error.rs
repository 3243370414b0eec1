use std::path::PathBuf;

pub type Result<T, E = ClassifierError> = std::result::Result<T, E>;

/// Errors raised while fetching, loading, or running the model. The worker
/// surfaces the display string to the UI as a `Failure` event.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("download of {file} failed: {reason}")]
    Fetch { file: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("model file not found: {0}")]
    MissingFile(PathBuf),

    #[error("model config error: {0}")]
    Config(String),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("model error: {0}")]
    Model(#[from] candle::Error),
}

impl From<serde_json::Error> for ClassifierError {
    fn from(err: serde_json::Error) -> Self {
        ClassifierError::Config(err.to_string())
    }
}
