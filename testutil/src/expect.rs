//! Blocking GET/POST helpers with chained response checks.
//!
//! # Design
//! A request is attempted exactly once and its outcome (response or
//! transport error) is parked in a `ResponseExpectation`. The check methods
//! take `self` by value, so a response body is drained at most once and an
//! expectation cannot be reused. Failures go to the `Reporter` the request
//! was issued with; a status mismatch does not stop the body check.

use http::Response;
use regex::bytes::Regex;
use ureq::{Agent, Body};

use crate::error::Failure;
use crate::report::Reporter;

/// Issues requests for response checks.
///
/// The agent must return 4xx/5xx responses as data instead of errors
/// (`http_status_as_error(false)`), otherwise a status mismatch surfaces as
/// a `Failure::Request`.
#[derive(Clone)]
pub struct Client {
    agent: Agent,
}

impl Client {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self::with_agent(agent)
    }

    pub fn with_agent(agent: Agent) -> Self {
        Self { agent }
    }

    /// `GET url`.
    pub fn get<'r>(&self, reporter: &'r dyn Reporter, url: &str) -> ResponseExpectation<'r> {
        tracing::debug!(%url, "GET");
        ResponseExpectation::new(reporter, self.agent.get(url).call())
    }

    /// `POST url` with `form` sent as `application/x-www-form-urlencoded`.
    /// Keys may repeat.
    pub fn post<'r>(
        &self,
        reporter: &'r dyn Reporter,
        url: &str,
        form: &[(&str, &str)],
    ) -> ResponseExpectation<'r> {
        tracing::debug!(%url, fields = form.len(), "POST");
        ResponseExpectation::new(reporter, self.agent.post(url).send_form(form.iter().copied()))
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// `GET url` with a default [`Client`].
pub fn http_get<'r>(reporter: &'r dyn Reporter, url: &str) -> ResponseExpectation<'r> {
    Client::new().get(reporter, url)
}

/// `POST url` with form data and a default [`Client`].
pub fn http_post<'r>(
    reporter: &'r dyn Reporter,
    url: &str,
    form: &[(&str, &str)],
) -> ResponseExpectation<'r> {
    Client::new().post(reporter, url, form)
}

/// Outcome of one request, waiting to be checked.
pub struct ResponseExpectation<'r> {
    reporter: &'r dyn Reporter,
    outcome: Result<Response<Body>, ureq::Error>,
}

impl<'r> ResponseExpectation<'r> {
    fn new(reporter: &'r dyn Reporter, outcome: Result<Response<Body>, ureq::Error>) -> Self {
        if let Ok(response) = &outcome {
            tracing::debug!(status = response.status().as_u16(), "response received");
        }
        Self { reporter, outcome }
    }

    /// Status of the response, `None` if the request failed.
    pub fn status(&self) -> Option<u16> {
        self.outcome.as_ref().ok().map(|r| r.status().as_u16())
    }

    /// Check the status code and, unless `body` is empty, that the body
    /// equals `body` byte for byte.
    pub fn expect(self, code: u16, body: &str) {
        let Self { reporter, outcome } = self;
        let Some(mut response) = check_status(reporter, outcome, code) else {
            return;
        };
        if body.is_empty() {
            return;
        }
        let Some(raw) = read_body(reporter, &mut response) else {
            return;
        };
        if raw != body.as_bytes() {
            reporter.report(Failure::Body {
                expected: body.to_string(),
                actual: String::from_utf8_lossy(&raw).into_owned(),
            });
        }
    }

    /// Check the status code and, unless `pattern` is empty, that the body
    /// matches the regular expression `pattern`.
    ///
    /// A pattern that does not compile aborts the test through
    /// [`Reporter::fatal`], whatever became of the request.
    pub fn expect_pattern(self, code: u16, pattern: &str) {
        let Self { reporter, outcome } = self;
        let regex = if pattern.is_empty() {
            None
        } else {
            match Regex::new(pattern) {
                Ok(regex) => Some(regex),
                Err(source) => reporter.fatal(Failure::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                }),
            }
        };

        let Some(mut response) = check_status(reporter, outcome, code) else {
            return;
        };
        let Some(regex) = regex else {
            return;
        };
        let Some(raw) = read_body(reporter, &mut response) else {
            return;
        };
        if !regex.is_match(&raw) {
            reporter.report(Failure::PatternMismatch {
                pattern: pattern.to_string(),
                body: String::from_utf8_lossy(&raw).into_owned(),
            });
        }
    }
}

/// Report a transport error or a status mismatch. Only a transport error
/// stops further checks.
fn check_status(
    reporter: &dyn Reporter,
    outcome: Result<Response<Body>, ureq::Error>,
    expected: u16,
) -> Option<Response<Body>> {
    let response = match outcome {
        Ok(response) => response,
        Err(err) => {
            reporter.report(Failure::Request(err));
            return None;
        }
    };
    let actual = response.status().as_u16();
    if actual != expected {
        reporter.report(Failure::Status { expected, actual });
    }
    Some(response)
}

/// Drain the whole body. ureq caps reads at 10 MiB by default; the cap is
/// lifted so large bodies are still compared.
fn read_body(reporter: &dyn Reporter, response: &mut Response<Body>) -> Option<Vec<u8>> {
    match response.body_mut().with_config().limit(u64::MAX).read_to_vec() {
        Ok(raw) => Some(raw),
        Err(err) => {
            reporter.report(Failure::ReadBody(err));
            None
        }
    }
}
