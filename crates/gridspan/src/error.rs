//! Error types for the gridspan editor

use thiserror::Error;

use crate::config::Feature;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`Editor`](crate::Editor) operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A grid model error
    #[error(transparent)]
    Grid(#[from] gridspan_core::Error),

    /// The operation is switched off by the host configuration
    #[error("Feature is disabled: {0}")]
    FeatureDisabled(Feature),
}

impl Error {
    /// Whether this error should be shown to the user as a blocking message
    ///
    /// Snapshot failures are recovered locally and never reach the user.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Error::Grid(gridspan_core::Error::MalformedSnapshot(_)))
    }
}
