use std::time::Duration;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What `/echo` reflects back about the request it received.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub content_type: Option<String>,
    pub user_agent: Option<String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/ok", get(ok))
        .route("/echo", post(echo).put(echo).patch(echo))
        .route("/missing", get(missing))
        .route("/empty", get(empty).delete(empty))
        .route("/dup-headers", get(dup_headers))
        .route("/slow", get(slow))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn ok() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], "ok")
}

async fn echo(headers: HeaderMap, body: String) -> Json<Echo> {
    let text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    Json(Echo {
        content_type: text(header::CONTENT_TYPE),
        user_agent: text(header::USER_AGENT),
        body,
    })
}

async fn missing() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "no such resource")
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn dup_headers() -> impl IntoResponse {
    (
        AppendHeaders([("x-variant", "first"), ("x-variant", "second")]),
        "dup",
    )
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(2)).await;
    "late"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_serializes_to_json() {
        let echo = Echo {
            content_type: Some("application/json".to_string()),
            user_agent: Some("httpc/1.0".to_string()),
            body: r#"{"k":1}"#.to_string(),
        };
        let json = serde_json::to_value(&echo).unwrap();
        assert_eq!(json["content_type"], "application/json");
        assert_eq!(json["body"], r#"{"k":1}"#);
    }

    #[test]
    fn echo_roundtrips_through_json() {
        let echo = Echo {
            content_type: None,
            user_agent: None,
            body: "plain".to_string(),
        };
        let json = serde_json::to_string(&echo).unwrap();
        let back: Echo = serde_json::from_str(&json).unwrap();
        assert!(back.content_type.is_none());
        assert_eq!(back.body, "plain");
    }
}
