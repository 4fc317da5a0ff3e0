use book_core::RulesError;

/// Input the query layer refuses to work with. Book and engine failures never
/// surface here; they degrade to an engine fallback or the null move.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidFen(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),
}

impl From<RulesError> for ServiceError {
    fn from(e: RulesError) -> Self {
        ServiceError::InvalidFen(e.to_string())
    }
}
