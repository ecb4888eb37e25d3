//! Public entry points: one thin wrapper per HTTP method.
//!
//! # Design
//! `HttpClient` holds only configuration (user-agent string, optional
//! deadline) and no mutable state, so a single value can serve any number
//! of threads. Every entry point returns a [`Response`]; failures come
//! back in its `error` slot, never as a panic or an `Err` crossing this
//! boundary. Each call is one full exchange: connect, send, receive, tear
//! down.

use std::collections::HashMap;
use std::time::Duration;

use crate::response::Response;
use crate::transport::{self, Session};

/// The supported request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

const DEFAULT_USER_AGENT: &str = "httpc/1.0";

/// Synchronous HTTP/HTTPS client.
///
/// One call performs one blocking exchange; no connection is pooled or
/// reused. Redirects, cookies and retries are out of scope; callers
/// wanting retry policy wrap these calls themselves.
#[derive(Debug, Clone)]
pub struct HttpClient {
    user_agent: String,
    timeout: Option<Duration>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    pub fn new() -> Self {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Client with a custom `User-Agent` identifier.
    pub fn with_user_agent(user_agent: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            timeout: None,
        }
    }

    /// Apply a connect/read/write deadline to every exchange. Without one,
    /// a stalled server blocks the calling thread indefinitely.
    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    pub fn get(&self, url: &str, headers: &HashMap<String, String>) -> Response {
        self.send_request(Method::Get, url, &[], headers)
    }

    pub fn post(&self, url: &str, body: &[u8], headers: &HashMap<String, String>) -> Response {
        self.send_request(Method::Post, url, body, headers)
    }

    pub fn put(&self, url: &str, body: &[u8], headers: &HashMap<String, String>) -> Response {
        self.send_request(Method::Put, url, body, headers)
    }

    pub fn patch(&self, url: &str, body: &[u8], headers: &HashMap<String, String>) -> Response {
        self.send_request(Method::Patch, url, body, headers)
    }

    pub fn delete(&self, url: &str, headers: &HashMap<String, String>) -> Response {
        self.send_request(Method::Delete, url, &[], headers)
    }

    pub fn head(&self, url: &str, headers: &HashMap<String, String>) -> Response {
        self.send_request(Method::Head, url, &[], headers)
    }

    pub fn options(&self, url: &str, headers: &HashMap<String, String>) -> Response {
        self.send_request(Method::Options, url, &[], headers)
    }

    /// POST a JSON document.
    ///
    /// The document is serialized with serde_json and sent with
    /// `Content-Type: application/json`, replacing any caller-supplied
    /// value for that key.
    pub fn post_json(
        &self,
        url: &str,
        json: &serde_json::Value,
        headers: &HashMap<String, String>,
    ) -> Response {
        let body = match serde_json::to_string(json) {
            Ok(body) => body,
            Err(e) => return Response::from_error(format!("JSON serialization failed: {e}")),
        };
        let mut headers = headers.clone();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        self.send_request(Method::Post, url, body.as_bytes(), &headers)
    }

    fn send_request(
        &self,
        method: Method,
        url: &str,
        body: &[u8],
        headers: &HashMap<String, String>,
    ) -> Response {
        let session = Session {
            user_agent: &self.user_agent,
            timeout: self.timeout,
        };
        transport::run(&session, method, url, body, headers)
    }
}
