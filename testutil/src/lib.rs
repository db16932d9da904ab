//! Test helpers for code built on `web-core`.
//!
//! # Overview
//! - [`http_get`] / [`http_post`] issue one blocking request and return a
//!   [`ResponseExpectation`] to check status and body against.
//! - [`new_request_pair`] / [`new_test_context`] build an in-memory
//!   `GET /` request and a [`ResponseRecorder`] so actions can be driven
//!   without a socket.
//! - [`TestFilter`] is a filter that records when it was invoked and when
//!   the action it wraps finished.
//!
//! # Design
//! - Checks report through a [`Reporter`] instead of returning errors. A
//!   mismatch is a soft failure and later checks still run; a malformed
//!   pattern is fatal. [`TestReporter`] collects soft failures and fails
//!   the test when it goes out of scope.
//! - Everything here is single-threaded and blocking. Nothing retries.

pub mod error;
pub mod expect;
pub mod filter;
pub mod recorder;
pub mod report;

pub use error::Failure;
pub use expect::{http_get, http_post, Client, ResponseExpectation};
pub use filter::{FilterState, TestFilter, FINISH_DELAY};
pub use recorder::{new_request_pair, new_test_context, ResponseRecorder};
pub use report::{Reporter, TestReporter};
