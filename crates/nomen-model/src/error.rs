use thiserror::Error;

/// Errors raised while building or loading a type model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// An accessibility code or name outside the known set.
    ///
    /// This is an invariant violation, not a recoverable input problem: an
    /// unknown accessibility is never mapped to a default.
    #[error("invalid state: unknown accessibility `{0}`")]
    UnknownAccessibility(String),

    #[error("unknown type kind `{0}`")]
    UnknownTypeKind(String),

    #[error("unknown member kind `{0}`")]
    UnknownMemberKind(String),

    /// A definition references a type key that does not exist.
    #[error("`{owner}` references unknown type `{name}`")]
    UnknownType { owner: String, name: String },

    #[error("`{owner}` references unknown module `{name}`")]
    UnknownModule { owner: String, name: String },

    #[error("duplicate type `{0}`")]
    DuplicateType(String),

    #[error("duplicate module `{0}`")]
    DuplicateModule(String),

    /// The base-type graph contains a cycle through the named type.
    #[error("cyclic inheritance through `{0}`")]
    CyclicHierarchy(String),

    #[error("malformed model file")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    /// Whether this error reports a broken invariant rather than bad input.
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            ModelError::UnknownAccessibility(_) | ModelError::CyclicHierarchy(_)
        )
    }
}
