use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Model artifact not found at '{0}'. Run the training pipeline first to produce it")]
    ArtifactMissing(String),

    #[error("Invalid model artifact: {0}")]
    Artifact(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Prediction error: {0}")]
    Prediction(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
