/// Errors from tree construction.
///
/// Normal tree operations never fail; structural invariant violations are
/// programming errors and are caught by debug assertions instead.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TreeError {
    /// The minimum degree must be at least 2.
    #[error("invalid minimum degree {0}: must be at least 2")]
    InvalidMinDegree(usize),
}

/// Result alias for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
