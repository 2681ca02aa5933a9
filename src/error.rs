use thiserror::Error;

pub type Result<T> = std::result::Result<T, MosqueError>;

#[derive(Error, Debug)]
pub enum MosqueError {
    /// Rejected before any query runs.
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Mosque {0} not found")]
    NotFound(i64),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage failure: {0}")]
    Upstream(#[from] rusqlite::Error),

    #[error("Malformed document: {0}")]
    Document(#[from] serde_json::Error),
}

impl MosqueError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden(reason.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::Document(_))
    }
}
