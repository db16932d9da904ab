//! Host framework contract for request handling.
//!
//! # Overview
//! An `Action` turns a `Context` into an `ActionResult`. A `Filter` wraps an
//! action in another action, which is how cross-cutting behavior (timing,
//! auth, logging) gets layered onto handlers. `apply_filters` composes a
//! stack of filters around one action.
//!
//! # Design
//! - `Context` is generic over its `ResponseWriter`, so a test can hand in an
//!   in-memory recorder and inspect it afterwards through `response()`.
//! - Actions and filters are `Rc`-shared and not `Send`: a request is handled
//!   start to finish on one thread.
//! - A failed action still produces a response. `Context::run` renders the
//!   `WebError` with its status code.

pub mod action;
pub mod context;
pub mod error;

pub use action::{action, apply_filters, Action, ActionResult, Filter, Reply};
pub use context::{Context, Request, ResponseWriter};
pub use error::WebError;
