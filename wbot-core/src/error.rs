use thiserror::Error;

#[derive(Error, Debug)]
pub enum WbotError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Messaging error: {0}")]
    Messaging(String),

    #[error("Handler panicked: {0}")]
    Panic(String),
}

pub type Result<T> = std::result::Result<T, WbotError>;
