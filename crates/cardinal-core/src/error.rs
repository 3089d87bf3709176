//! Errors returned by graph analysis.

use thiserror::Error;

/// Failures surfaced by [`crate::Graph::with_config`].
///
/// Analysis of a well-formed expression cannot fail; the only error is a
/// configured size guard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("content model has {count} distinct particles, limit is {limit}")]
    TooManyPositions { count: usize, limit: usize },
}

impl GraphError {
    /// Stable identifier for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TooManyPositions { .. } => "too_many_positions",
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::TooManyPositions { .. } => {
                Some("Raise `max_positions` in the analysis config or split the content model.")
            }
        }
    }
}
