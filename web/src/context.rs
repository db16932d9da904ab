//! Per-request state handed to every action.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use crate::action::{Action, Reply};

/// Incoming request with a fully buffered body.
pub type Request = http::Request<Bytes>;

/// Destination for everything an action writes back to the client.
pub trait ResponseWriter {
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Set the response status. Only the first call takes effect.
    fn write_status(&mut self, status: StatusCode);

    /// Append `chunk` to the body. Implies `200 OK` when no status was
    /// written before.
    fn write_body(&mut self, chunk: &[u8]);
}

/// The request being handled together with the writer for its response.
#[derive(Debug)]
pub struct Context<W> {
    request: Request,
    response: W,
}

impl<W: ResponseWriter> Context<W> {
    pub fn new(response: W, request: Request) -> Self {
        Self { request, response }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn response(&self) -> &W {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut W {
        &mut self.response
    }

    pub fn into_parts(self) -> (W, Request) {
        (self.response, self.request)
    }

    /// Write `reply` to the response: headers first, then status, then body.
    pub fn render(&mut self, reply: Reply) {
        let (status, headers, body) = reply.into_parts();
        self.response.headers_mut().extend(headers);
        self.response.write_status(status);
        if !body.is_empty() {
            self.response.write_body(&body);
        }
    }

    /// Invoke `action` and render whatever it produced. Errors are rendered
    /// as a plain-text reply carrying the error's status code.
    ///
    /// Returns the status that was rendered.
    pub fn run(&mut self, action: &Action<W>) -> StatusCode {
        let reply = match action(self) {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(
                    method = %self.request.method(),
                    uri = %self.request.uri(),
                    error = %err,
                    "action failed"
                );
                Reply::text(err.status(), err.to_string())
            }
        };
        let status = reply.status();
        self.render(reply);
        status
    }
}
