//! The staged transport pipeline for one exchange.
//!
//! # Design
//! One call = one session, one connection, one request; nothing survives
//! the exchange. The stages run in strict order (parse the URL, connect
//! with a TLS wrap for https, build and send the request, read the response
//! head, extract status and headers, drain the body) and the first failing
//! stage aborts the rest with a stage diagnostic. [`run`] funnels that
//! diagnostic into the `Response` error slot, so callers never see an
//! `Err`. Ownership does the resource scoping: the stream and buffers are
//! locals of the exchange and are released on every exit path.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace};
use rustls::pki_types::ServerName;
use rustls::{ClientConnection, RootCertStore, StreamOwned};

use crate::client::Method;
use crate::error::HttpError;
use crate::headers;
use crate::response::Response;
use crate::url::{self, ParsedUrl, Scheme};

/// Body chunks are read at this granularity.
const BODY_CHUNK_SIZE: usize = 4096;

/// Upper bound on the accumulated response head.
const MAX_HEAD_SIZE: usize = 64 * 1024;

/// Per-exchange session: client identity plus the socket deadline. Scoped
/// to one exchange like every other resource here.
pub(crate) struct Session<'a> {
    pub user_agent: &'a str,
    pub timeout: Option<Duration>,
}

/// Run one exchange, converting any stage failure into `Response::error`.
pub(crate) fn run(
    session: &Session<'_>,
    method: Method,
    raw_url: &str,
    body: &[u8],
    extra_headers: &HashMap<String, String>,
) -> Response {
    let mut response = Response::default();
    if let Err(err) = exchange(session, method, raw_url, body, extra_headers, &mut response) {
        debug!("{} {raw_url} aborted: {err}", method.as_str());
        response.error = Some(err.to_string());
    }
    response
}

/// The ordered stages. Results land in `response` as they become available,
/// so a post-status failure still leaves the extracted status in place
/// while the body stays discarded.
fn exchange(
    session: &Session<'_>,
    method: Method,
    raw_url: &str,
    body: &[u8],
    extra_headers: &HashMap<String, String>,
    response: &mut Response,
) -> Result<(), HttpError> {
    let parsed = url::parse(raw_url)?;
    debug!(
        "{} {}:{}{}",
        method.as_str(),
        parsed.host,
        parsed.port,
        parsed.path
    );

    let mut stream = connect(session, &parsed)?;

    let head = build_head(method, &parsed, session.user_agent, body.len(), extra_headers);
    trace!("request head:\n{head}");
    send(&mut stream, &head, body)?;

    let (head_bytes, overread) = receive_head(&mut stream)?;
    let raw_head =
        String::from_utf8(head_bytes).map_err(|e| HttpError::Headers(e.to_string()))?;
    trace!("response head:\n{raw_head}");

    response.status_code = parse_status_line(&raw_head)?;
    response.headers = headers::parse(&raw_head);
    response.body = read_body(&mut stream, overread)?;
    debug!(
        "{} -> {} ({} body bytes)",
        parsed.path,
        response.status_code,
        response.body.len()
    );
    Ok(())
}

/// One connection, plain or TLS-wrapped; the stages above are
/// transport-blind.
enum Stream {
    Plain(TcpStream),
    Tls(Box<StreamOwned<ClientConnection, TcpStream>>),
}

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Stream::Plain(stream) => stream.read(buf),
            Stream::Tls(stream) => stream.read(buf),
        }
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Stream::Plain(stream) => stream.write(buf),
            Stream::Tls(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Stream::Plain(stream) => stream.flush(),
            Stream::Tls(stream) => stream.flush(),
        }
    }
}

/// Stage: connection acquisition. TCP connect to (host, port), then the TLS
/// wrap when the scheme asks for it. The session deadline covers the
/// connect itself and all later reads and writes on the socket.
fn connect(session: &Session<'_>, url: &ParsedUrl) -> Result<Stream, HttpError> {
    let tcp = match session.timeout {
        Some(limit) => {
            let addr = (url.host.as_str(), url.port)
                .to_socket_addrs()
                .map_err(|e| HttpError::Connect(e.to_string()))?
                .next()
                .ok_or_else(|| HttpError::Connect(format!("no address for {}", url.host)))?;
            TcpStream::connect_timeout(&addr, limit)
        }
        None => TcpStream::connect((url.host.as_str(), url.port)),
    }
    .map_err(|e| HttpError::Connect(e.to_string()))?;

    tcp.set_read_timeout(session.timeout)
        .and_then(|()| tcp.set_write_timeout(session.timeout))
        .map_err(|e| HttpError::Connect(e.to_string()))?;

    match url.scheme {
        Scheme::Http => Ok(Stream::Plain(tcp)),
        Scheme::Https => {
            let name = ServerName::try_from(url.host.clone())
                .map_err(|e| HttpError::Tls(e.to_string()))?;
            let conn = ClientConnection::new(tls_config(), name)
                .map_err(|e| HttpError::Tls(e.to_string()))?;
            Ok(Stream::Tls(Box::new(StreamOwned::new(conn, tcp))))
        }
    }
}

/// Certificate roots for https connections. Built per exchange — no state
/// is shared across calls.
fn tls_config() -> Arc<rustls::ClientConfig> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    Arc::new(
        rustls::ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth(),
    )
}

/// Stages: request construction and header attachment. Builds the request
/// line and the standard headers, then appends the caller's serialized
/// block. Standard `Host`/`User-Agent` give way when the caller supplies
/// their own.
fn build_head(
    method: Method,
    url: &ParsedUrl,
    user_agent: &str,
    body_len: usize,
    extra_headers: &HashMap<String, String>,
) -> String {
    let mut head = format!("{} {} HTTP/1.1\r\n", method.as_str(), url.path);

    if !has_header(extra_headers, "Host") {
        if url.is_default_port() {
            head.push_str(&format!("Host: {}\r\n", url.host));
        } else {
            head.push_str(&format!("Host: {}:{}\r\n", url.host, url.port));
        }
    }
    if !has_header(extra_headers, "User-Agent") {
        head.push_str(&format!("User-Agent: {user_agent}\r\n"));
    }
    head.push_str("Connection: close\r\n");
    if body_len > 0 {
        head.push_str(&format!("Content-Length: {body_len}\r\n"));
    }

    let caller_block = headers::serialize(extra_headers);
    if !caller_block.is_empty() {
        head.push_str(&caller_block);
    }
    head.push_str("\r\n");
    head
}

fn has_header(headers: &HashMap<String, String>, name: &str) -> bool {
    headers.keys().any(|k| k.eq_ignore_ascii_case(name))
}

/// Stage: send. Head (blank line included), then the body bytes; a
/// zero-length body still sends a complete, well-formed request.
fn send(stream: &mut Stream, head: &str, body: &[u8]) -> Result<(), HttpError> {
    stream
        .write_all(head.as_bytes())
        .and_then(|()| stream.write_all(body))
        .and_then(|()| stream.flush())
        .map_err(|e| HttpError::Send(e.to_string()))
}

/// Stage: receive. Reads until the CR-LF CR-LF terminator and returns the
/// raw head bytes plus whatever body bytes arrived in the same reads.
fn receive_head<R: Read>(stream: &mut R) -> Result<(Vec<u8>, Vec<u8>), HttpError> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; BODY_CHUNK_SIZE];
    loop {
        if let Some(end) = find_subsequence(&buf, b"\r\n\r\n") {
            let overread = buf.split_off(end + 4);
            // Keep the final header line's CR-LF, drop the blank line.
            buf.truncate(end + 2);
            return Ok((buf, overread));
        }
        if buf.len() > MAX_HEAD_SIZE {
            return Err(HttpError::Receive("response head too large".to_string()));
        }
        let n = stream
            .read(&mut chunk)
            .map_err(|e| HttpError::Receive(e.to_string()))?;
        if n == 0 {
            return Err(HttpError::Receive(
                "connection closed before response head".to_string(),
            ));
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

/// Stage: status extraction. `HTTP/1.1 200 OK` -> 200.
fn parse_status_line(raw_head: &str) -> Result<u16, HttpError> {
    let line = raw_head.lines().next().unwrap_or("");
    let code = line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| HttpError::Status(line.to_string()))?;
    code.parse::<u16>()
        .map_err(|_| HttpError::Status(line.to_string()))
}

/// Stage: body extraction. Fixed-size reads appended to the accumulator
/// until a zero-length read. A failed read aborts the exchange and the
/// partial body never reaches the caller. TLS peers that close the link
/// without a close_notify count as end-of-stream, not as a failure.
fn read_body<R: Read>(stream: &mut R, mut accumulated: Vec<u8>) -> Result<String, HttpError> {
    let mut chunk = [0u8; BODY_CHUNK_SIZE];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => accumulated.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(HttpError::Body(e.to_string())),
        }
    }
    Ok(String::from_utf8_lossy(&accumulated).into_owned())
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
