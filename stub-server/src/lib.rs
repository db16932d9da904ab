use std::collections::BTreeMap;

use axum::{
    extract::{Form, Path},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;

/// Body served at `/`.
pub const GREETING: &str = "hello";

pub fn app() -> Router {
    Router::new()
        .route("/", get(greet))
        .route("/status/{status}", get(status_only))
        .route("/reply/{status}/{body}", get(reply))
        .route("/form", post(echo_form))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn greet() -> &'static str {
    GREETING
}

async fn status_only(Path(status): Path<u16>) -> Result<StatusCode, StatusCode> {
    parse_status(status)
}

async fn reply(
    Path((status, body)): Path<(u16, String)>,
) -> Result<(StatusCode, String), StatusCode> {
    Ok((parse_status(status)?, body))
}

/// Echo the submitted fields as a JSON object of key to values, keys sorted
/// and repeated keys kept in submission order.
async fn echo_form(
    Form(fields): Form<Vec<(String, String)>>,
) -> Json<BTreeMap<String, Vec<String>>> {
    tracing::debug!(fields = fields.len(), "form received");
    let mut echoed: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in fields {
        echoed.entry(key).or_default().push(value);
    }
    Json(echoed)
}

/// Status code taken from the path; anything outside 100..=999 is a 400.
fn parse_status(code: u16) -> Result<StatusCode, StatusCode> {
    StatusCode::from_u16(code).map_err(|_| {
        tracing::debug!(code, "rejecting status code");
        StatusCode::BAD_REQUEST
    })
}
