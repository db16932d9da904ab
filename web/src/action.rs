//! Actions, their replies, and the filters that wrap them.

use std::rc::Rc;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};

use crate::context::Context;
use crate::error::WebError;

/// What a successful action hands back to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Reply {
    /// A reply with `status` and no body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// A `text/plain` reply.
    pub fn text(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self::new(status)
            .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))
            .with_body(body)
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub(crate) fn into_parts(self) -> (StatusCode, HeaderMap, Bytes) {
        (self.status, self.headers, self.body)
    }
}

pub type ActionResult = Result<Reply, WebError>;

/// A unit of request handling.
pub type Action<W> = Rc<dyn Fn(&mut Context<W>) -> ActionResult>;

/// Box a closure up as an [`Action`].
pub fn action<W, F>(f: F) -> Action<W>
where
    F: Fn(&mut Context<W>) -> ActionResult + 'static,
{
    Rc::new(f)
}

/// Middleware: takes the next action in the chain and returns the action
/// to run in its place.
pub trait Filter<W> {
    fn wrap(&self, next: Action<W>) -> Action<W>;
}

impl<W, F> Filter<W> for F
where
    F: Fn(Action<W>) -> Action<W>,
{
    fn wrap(&self, next: Action<W>) -> Action<W> {
        self(next)
    }
}

/// Wrap `action` in `filters`. The first filter ends up outermost, so it
/// sees the request first and the reply last.
pub fn apply_filters<W>(action: Action<W>, filters: &[&dyn Filter<W>]) -> Action<W> {
    filters
        .iter()
        .rev()
        .fold(action, |next, filter| filter.wrap(next))
}
