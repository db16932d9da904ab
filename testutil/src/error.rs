//! Failures reported by the response checks.
//!
//! # Design
//! Every check produces at most one `Failure` per mismatch and hands it to a
//! `Reporter`. Transport problems (`Request`, `ReadBody`) keep the underlying
//! `ureq` error for debugging. `InvalidPattern` is the only variant raised
//! through `Reporter::fatal`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Failure {
    /// The request never produced a response.
    #[error("error while getting response: {0}")]
    Request(#[source] ureq::Error),

    /// The response arrived with an unexpected status code.
    #[error("wrong status code: expected {expected}, got {actual}")]
    Status { expected: u16, actual: u16 },

    /// The response body could not be drained.
    #[error("error while reading response: {0}")]
    ReadBody(#[source] ureq::Error),

    /// The body differs from the expected literal.
    #[error("wrong response body: expected {expected:?}, got {actual:?}")]
    Body { expected: String, actual: String },

    /// The body does not match the expected pattern.
    #[error("response body {body:?} does not match pattern {pattern:?}")]
    PatternMismatch { pattern: String, body: String },

    /// The expected pattern is not a valid regular expression.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
