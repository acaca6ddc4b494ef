use nomen_model::ModelError;
use thiserror::Error;

/// Errors raised at the lookup boundary.
///
/// Not finding a member, or finding an ambiguous set, is not an error; those
/// outcomes are tags of [`ResolveResult`](crate::ResolveResult).
#[derive(Debug, Error)]
pub enum LookupError {
    /// A required input is missing or names nothing in the type model.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The type model broke an invariant lookup relies on.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl LookupError {
    pub(crate) fn argument(message: impl Into<String>) -> Self {
        LookupError::InvalidArgument(message.into())
    }

    pub(crate) fn state(message: impl Into<String>) -> Self {
        LookupError::InvalidState(message.into())
    }

    pub fn is_invalid_state(&self) -> bool {
        match self {
            LookupError::InvalidState(_) => true,
            LookupError::Model(err) => err.is_invalid_state(),
            LookupError::InvalidArgument(_) => false,
        }
    }
}
