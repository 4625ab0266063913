use crate::model::SpellId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpellbookError {
    #[error("Invalid spell data: {0}")]
    Validation(String),

    #[error("Spell not found: {0}")]
    NotFound(SpellId),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Api Error: {0}")]
    Api(String),
}

impl SpellbookError {
    pub fn validation(msg: impl Into<String>) -> Self {
        SpellbookError::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SpellbookError>;
