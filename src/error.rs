//! Error types for the query path

use thiserror::Error;

/// Failures a single search call can produce.
///
/// Both variants are driven by user input and recoverable: a failed call
/// leaves the corpus and any later search untouched.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The query text produced a pattern that does not compile, e.g. an
    /// unbalanced bracket typed into the raw query.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Matching gave up mid-scan (pathological pattern).
    #[error("Match error: {0}")]
    Match(String),
}
