//! In-memory response writer and a ready-made request to go with it.

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, StatusCode};
use web_core::{Context, Request, ResponseWriter};

/// Captures everything an action writes so a test can inspect it afterwards.
#[derive(Debug, Default)]
pub struct ResponseRecorder {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The written status, or `200 OK` when nothing has been written.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Whether a status (explicit or implied by a body write) was written.
    pub fn is_written(&self) -> bool {
        self.status.is_some()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Bytes {
        self.body.clone().freeze()
    }

    /// The body decoded as UTF-8, with invalid sequences replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl ResponseWriter for ResponseRecorder {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        self.status.get_or_insert(status);
    }

    fn write_body(&mut self, chunk: &[u8]) {
        self.status.get_or_insert(StatusCode::OK);
        self.body.extend_from_slice(chunk);
    }
}

/// A fresh recorder and a bodiless `GET /` request.
pub fn new_request_pair() -> (ResponseRecorder, Request) {
    (ResponseRecorder::new(), Request::new(Bytes::new()))
}

/// A `Context` built from [`new_request_pair`].
pub fn new_test_context() -> Context<ResponseRecorder> {
    let (response, request) = new_request_pair();
    Context::new(response, request)
}
