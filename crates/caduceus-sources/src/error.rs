use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("tantivy error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("duplicate excerpt id: {0}")]
    DuplicateExcerpt(String),

    /// A failure worth one retry (e.g. a busy document store).
    #[error("transient source failure: {0}")]
    Transient(String),

    #[error("source index unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    pub fn is_transient(&self) -> bool {
        matches!(self, SourceError::Transient(_))
    }
}
