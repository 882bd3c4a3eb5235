use thiserror::Error;

#[derive(Debug, Error)]
pub enum BristleError {
    #[error("detector error: {0}")]
    Detector(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("reply error: {0}")]
    Reply(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BristleResult<T> = Result<T, BristleError>;
