//! Error types for lattice matching.

use thiserror::Error;

/// Errors reported by the matching pipeline.
///
/// A rationalization that misses the requested tolerance is not an error; it is
/// reported through [`crate::matching::RationalApproximation::within_tolerance`].
#[derive(Debug, Error)]
pub enum MatchError {
    /// Degenerate lattice, non-finite value or out-of-range parameter.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// One of the rationalized multiplicities is zero, so there is nothing to enumerate.
    #[error("no candidate supercell matrices for area ratio {numerator}/{denominator}")]
    NoCandidateFound { numerator: u32, denominator: u32 },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl MatchError {
    pub fn invalid_input(details: impl Into<String>) -> Self {
        Self::InvalidInput(details.into())
    }

    /// True for the recoverable "no match" outcome.
    pub fn is_no_candidate(&self) -> bool {
        matches!(self, Self::NoCandidateFound { .. })
    }
}

/// Result type for matching operations.
pub type Result<T> = std::result::Result<T, MatchError>;
