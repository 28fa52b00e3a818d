//! Error types for loading reference data and calling collaborators

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid reference data: {0}")]
    InvalidData(String),

    #[error("Collaborator error: {0}")]
    Collaborator(String),
}

impl Error {
    pub fn invalid_data<S: Into<String>>(msg: S) -> Self {
        Error::InvalidData(msg.into())
    }

    pub fn collaborator<S: Into<String>>(msg: S) -> Self {
        Error::Collaborator(msg.into())
    }
}
