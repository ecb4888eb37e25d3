//! Synchronous HTTP/HTTPS client.
//!
//! # Overview
//! One call performs one request/response exchange: the URL is decomposed,
//! a fresh connection is opened (TLS for https), the request is written,
//! and the result comes back as a plain [`Response`] value — status code,
//! headers, body, or a stage diagnostic in its `error` slot.
//!
//! # Design
//! - [`HttpClient`] holds only configuration; every exchange creates and
//!   tears down its own transport resources, so concurrent calls from
//!   multiple threads are independent.
//! - Entry points never panic and never return `Err`: all failures funnel
//!   into `Response::error`, with `status_code == 0` whenever the server
//!   was never reached.
//! - Non-goals: connection pooling, redirect following, cookies, retries,
//!   streaming body consumption.

pub mod client;
pub mod error;
pub mod headers;
pub mod response;
mod transport;
pub mod url;

pub use client::{HttpClient, Method};
pub use error::HttpError;
pub use response::Response;
pub use url::ParsedUrl;
