//! Error types for folio.

use std::fmt;

use thiserror::Error;

/// Result type alias using folio's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for folio operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Creation-time validation failed; carries every failure found.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Membership not found
    #[error("Membership not found: {0}")]
    MembershipNotFound(i64),

    /// A search kind identifier that no registered fetcher covers
    #[error("Unknown search kind: {0}")]
    UnknownSearchKind(String),

    /// A facet category with no registered label source
    #[error("Unknown facet category: {0}")]
    UnknownFacetCategory(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<ValidationErrors> for Error {
    fn from(e: ValidationErrors) -> Self {
        Error::Validation(e)
    }
}

/// A single user-facing validation failure on a membership submission.
///
/// Messages are the English defaults; localization happens at the
/// presentation layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// The (collection, item) pair already has a membership.
    #[error("That item appears to already be in that collection.")]
    AlreadyInCollection,

    /// A raw approval status outside {-1, 0, 1}.
    #[error("{0} is not a valid approval status.")]
    InvalidStatus(i16),

    /// The target collection is not accepting new items.
    #[error("Collection {title} is currently closed.")]
    CollectionClosed { title: String },
}

/// The collected failures from one validation pass.
///
/// All checks run before the submission is rejected, so the caller sees
/// every problem at once rather than one per attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationFailure>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failure.
    pub fn push(&mut self, failure: ValidationFailure) {
        self.0.push(failure);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The failures in the order they were found.
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.0
    }

    /// Convert to a `Result`: `Ok(())` when no failures were recorded.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for failure in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{failure}")?;
            first = false;
        }
        Ok(())
    }
}

impl From<ValidationFailure> for ValidationErrors {
    fn from(failure: ValidationFailure) -> Self {
        Self(vec![failure])
    }
}
