//! Error types for the exchange pipeline.
//!
//! # Design
//! One variant per pipeline stage, so a failed exchange names the stage that
//! gave up. The `Display` text is the diagnostic copied into
//! `Response::error`; nothing here ever crosses the public boundary as an
//! `Err`. `InvalidUrl` renders the exact message callers match on when a URL
//! is rejected before any socket is opened.

use std::fmt;

/// Failures raised by the stages of a single request/response exchange.
#[derive(Debug)]
pub enum HttpError {
    /// The URL did not match the `http(s)://host[:port][/path][?query]` grammar.
    InvalidUrl,

    /// No TCP connection to (host, port) could be established.
    Connect(String),

    /// TLS setup or handshake with the server failed.
    Tls(String),

    /// The request head or body could not be written to the stream.
    Send(String),

    /// The response head never arrived or was cut short.
    Receive(String),

    /// The status line carried no parsable numeric code.
    Status(String),

    /// The raw response head was not decodable text.
    Headers(String),

    /// A body chunk read failed mid-transfer.
    Body(String),
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpError::InvalidUrl => write!(f, "Invalid URL format."),
            HttpError::Connect(msg) => write!(f, "connect failed: {msg}"),
            HttpError::Tls(msg) => write!(f, "TLS setup failed: {msg}"),
            HttpError::Send(msg) => write!(f, "send failed: {msg}"),
            HttpError::Receive(msg) => write!(f, "receive failed: {msg}"),
            HttpError::Status(msg) => write!(f, "malformed status line: {msg}"),
            HttpError::Headers(msg) => write!(f, "header decode failed: {msg}"),
            HttpError::Body(msg) => write!(f, "body read failed: {msg}"),
        }
    }
}

impl std::error::Error for HttpError {}
