//! Response checks against a live stub server.
//!
//! # Design
//! Each test starts the stub server on a random port in a background thread
//! and issues real HTTP requests through the helpers. Failing checks are
//! drained from the `TestReporter` so the test can assert on exactly what
//! was reported.

use web_testutil::{http_get, http_post, Client, Failure, Reporter, TestReporter};

/// Start the stub server on a random port and return its base URL.
fn start_stub_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            stub_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// An address nothing is listening on.
fn closed_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

/// Answer a single connection with `response` verbatim, then close it.
fn serve_raw_once(response: Vec<u8>) -> String {
    use std::io::{BufRead, BufReader, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
            line.clear();
        }
        let mut stream = reader.into_inner();
        stream.write_all(&response).unwrap();
        stream.flush().unwrap();
    });

    format!("http://{addr}/")
}

fn raw_response(status_line: &str, content_length: usize, body: &[u8]) -> Vec<u8> {
    let mut response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Length: {content_length}\r\nConnection: close\r\n\r\n"
    )
    .into_bytes();
    response.extend_from_slice(body);
    response
}

// --- expect ---

#[test]
fn expect_passes_on_matching_status_and_body() {
    let base = start_stub_server();
    let t = TestReporter::new();

    http_get(&t, &format!("{base}/")).expect(200, "hello");
    http_get(&t, &format!("{base}/reply/200/hello")).expect(200, "hello");

    assert!(!t.has_failed());
}

#[test]
fn expect_reports_status_mismatch() {
    let base = start_stub_server();
    let t = TestReporter::new();

    http_get(&t, &format!("{base}/reply/404/hello")).expect(200, "hello");

    let failures = t.take_failures();
    assert_eq!(failures.len(), 1);
    assert!(matches!(
        failures[0],
        Failure::Status {
            expected: 200,
            actual: 404
        }
    ));
}

#[test]
fn expect_reports_body_mismatch() {
    let base = start_stub_server();
    let t = TestReporter::new();

    http_get(&t, &format!("{base}/reply/200/goodbye")).expect(200, "hello");

    let failures = t.take_failures();
    assert_eq!(failures.len(), 1);
    match &failures[0] {
        Failure::Body { expected, actual } => {
            assert_eq!(expected, "hello");
            assert_eq!(actual, "goodbye");
        }
        other => panic!("unexpected failure: {other}"),
    }
}

#[test]
fn status_mismatch_does_not_skip_body_check() {
    let base = start_stub_server();
    let t = TestReporter::new();

    http_get(&t, &format!("{base}/reply/500/goodbye")).expect(200, "hello");

    let failures = t.take_failures();
    assert_eq!(failures.len(), 2);
    assert!(matches!(failures[0], Failure::Status { actual: 500, .. }));
    assert!(matches!(failures[1], Failure::Body { .. }));
}

#[test]
fn empty_expected_body_checks_status_only() {
    let base = start_stub_server();
    let t = TestReporter::new();

    http_get(&t, &format!("{base}/reply/200/whatever")).expect(200, "");
    http_get(&t, &format!("{base}/status/204")).expect(204, "");

    assert!(!t.has_failed());
}

#[test]
fn body_over_ten_mib_is_compared_in_full() {
    let body = "a".repeat(11 * 1024 * 1024);
    let url = serve_raw_once(raw_response("200 OK", body.len(), body.as_bytes()));
    let t = TestReporter::new();

    http_get(&t, &url).expect(200, &body);

    assert!(!t.has_failed());
}

#[test]
fn truncated_body_is_reported_as_read_failure() {
    let url = serve_raw_once(raw_response("200 OK", 100, b"short"));
    let t = TestReporter::new();

    http_get(&t, &url).expect(200, "x");

    let failures = t.take_failures();
    assert!(matches!(failures[..], [Failure::ReadBody(_)]));
}

#[test]
fn status_is_checked_before_truncated_body() {
    let url = serve_raw_once(raw_response("201 Created", 100, b"short"));
    let t = TestReporter::new();

    http_get(&t, &url).expect(200, "x");

    let failures = t.take_failures();
    assert!(matches!(
        failures[..],
        [
            Failure::Status {
                expected: 200,
                actual: 201
            },
            Failure::ReadBody(_)
        ]
    ));
}

#[test]
fn request_error_is_reported_once() {
    let t = TestReporter::new();

    let expectation = http_get(&t, &closed_url());
    assert_eq!(expectation.status(), None);
    expectation.expect(200, "hello");

    let failures = t.take_failures();
    assert_eq!(failures.len(), 1);
    assert!(matches!(failures[0], Failure::Request(_)));
}

#[test]
fn status_is_visible_before_checking() {
    let base = start_stub_server();
    let t = TestReporter::new();

    let expectation = http_get(&t, &format!("{base}/status/418"));
    assert_eq!(expectation.status(), Some(418));
    expectation.expect(418, "");
}

// --- expect_pattern ---

#[test]
fn pattern_matches_body() {
    let base = start_stub_server();
    let t = TestReporter::new();

    http_get(&t, &format!("{base}/reply/200/hello")).expect_pattern(200, "^h.*o$");

    assert!(!t.has_failed());
}

#[test]
fn pattern_mismatch_is_reported() {
    let base = start_stub_server();
    let t = TestReporter::new();

    http_get(&t, &format!("{base}/reply/200/goodbye")).expect_pattern(200, "^h.*o$");

    let failures = t.take_failures();
    assert_eq!(failures.len(), 1);
    match &failures[0] {
        Failure::PatternMismatch { pattern, body } => {
            assert_eq!(pattern, "^h.*o$");
            assert_eq!(body, "goodbye");
        }
        other => panic!("unexpected failure: {other}"),
    }
}

#[test]
fn empty_pattern_checks_status_only() {
    let base = start_stub_server();
    let t = TestReporter::new();

    http_get(&t, &format!("{base}/reply/404/anything")).expect_pattern(200, "");

    let failures = t.take_failures();
    assert_eq!(failures.len(), 1);
    assert!(matches!(failures[0], Failure::Status { actual: 404, .. }));
}

#[test]
#[should_panic(expected = "invalid pattern")]
fn invalid_pattern_is_fatal() {
    let base = start_stub_server();
    let t = TestReporter::new();

    http_get(&t, &format!("{base}/")).expect_pattern(200, "(unclosed");
}

#[test]
#[should_panic(expected = "invalid pattern")]
fn invalid_pattern_is_fatal_even_without_response() {
    let t = TestReporter::new();

    http_get(&t, &closed_url()).expect_pattern(200, "[");
}

// --- post ---

#[test]
fn post_sends_form_fields() {
    let base = start_stub_server();
    let t = TestReporter::new();
    let url = format!("{base}/form");

    http_post(&t, &url, &[("name", "widget"), ("tag", "a"), ("tag", "b")])
        .expect(200, r#"{"name":["widget"],"tag":["a","b"]}"#);
    http_post(&t, &url, &[("q", "a b&c")]).expect_pattern(200, r#""q":\["a b&c"\]"#);

    assert!(!t.has_failed());
}

#[test]
fn post_to_get_only_route_reports_status() {
    let base = start_stub_server();
    let t = TestReporter::new();

    http_post(&t, &format!("{base}/"), &[]).expect(200, "");

    let failures = t.take_failures();
    assert!(matches!(failures[..], [Failure::Status { actual: 405, .. }]));
}

// --- client ---

#[test]
fn shared_client_issues_independent_requests() {
    let base = start_stub_server();
    let t = TestReporter::new();
    let client = Client::new();

    client.get(&t, &format!("{base}/reply/201/made")).expect(201, "made");
    client
        .post(&t, &format!("{base}/form"), &[("k", "v")])
        .expect(200, r#"{"k":["v"]}"#);

    assert!(!t.has_failed());
}

#[test]
fn agent_treating_status_as_error_reports_request_failure() {
    let base = start_stub_server();
    let t = TestReporter::new();
    let client = Client::with_agent(ureq::Agent::new_with_defaults());

    client.get(&t, &format!("{base}/status/404")).expect(404, "");

    let failures = t.take_failures();
    assert!(matches!(failures[..], [Failure::Request(_)]));
}

#[test]
fn custom_reporter_sees_every_failure() {
    use std::cell::RefCell;

    #[derive(Default)]
    struct Collect(RefCell<Vec<String>>);

    impl Reporter for Collect {
        fn report(&self, failure: Failure) {
            self.0.borrow_mut().push(failure.to_string());
        }
    }

    let base = start_stub_server();
    let collect = Collect::default();

    http_get(&collect, &format!("{base}/reply/404/nope")).expect(200, "yes");

    assert_eq!(
        *collect.0.borrow(),
        [
            "wrong status code: expected 200, got 404",
            "wrong response body: expected \"yes\", got \"nope\"",
        ]
    );
}
