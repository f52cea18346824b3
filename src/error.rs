use thiserror::Error;

/// Errors produced while generating claim and bridge instructions.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// The queried identity is present in no allocation set. Carries the
    /// address the caller actually controls (de-aliased for L1 callers).
    #[error("{0} address is not eligible")]
    NotEligible(String),

    /// A leaf index fell outside its own tree. Allocation sets are immutable
    /// once loaded, so this indicates corrupted allocation data.
    #[error("leaf index {index} is out of bounds for tree with {leaves} leaves")]
    LookupInconsistency { index: u64, leaves: usize },

    /// The base-cost query against the bridge hub failed. The transport
    /// error message is passed through verbatim; no retry is attempted.
    #[error("{0}")]
    ExternalQueryFailure(String),
}
