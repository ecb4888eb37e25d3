//! Absolute URL decomposition.
//!
//! # Design
//! Hand-rolled splitting instead of a URL crate: the accepted grammar is
//! deliberately narrow (`http(s)://host[:port][/path][?query]`) and the
//! parsed value lives only for the duration of one exchange. Anything
//! outside the grammar is rejected before a socket is opened.

use crate::error::HttpError;

/// URL scheme; decides the default port and whether the stream gets a TLS
/// wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

/// Decomposed absolute URL, constructed at the start of one exchange and
/// dropped at its end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    /// Path plus any query string, verbatim; `/` when the URL has no path.
    pub path: String,
}

impl ParsedUrl {
    /// Whether the `Host` header can omit the port.
    pub fn is_default_port(&self) -> bool {
        self.port == self.scheme.default_port()
    }
}

/// Parse an absolute `http`/`https` URL.
///
/// The port defaults to 80/443 by scheme; the path defaults to `/`; a query
/// string is appended to the path unchanged. Missing or unsupported scheme,
/// empty host, and non-numeric or out-of-range ports fail with
/// [`HttpError::InvalidUrl`].
pub fn parse(url: &str) -> Result<ParsedUrl, HttpError> {
    let (scheme, rest) = if let Some(rest) = url.strip_prefix("http://") {
        (Scheme::Http, rest)
    } else if let Some(rest) = url.strip_prefix("https://") {
        (Scheme::Https, rest)
    } else {
        return Err(HttpError::InvalidUrl);
    };

    // The authority runs until the path or query begins.
    let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
    let (authority, path_and_query) = rest.split_at(authority_end);

    let (host, port) = match authority.split_once(':') {
        Some((host, port)) => {
            if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
                return Err(HttpError::InvalidUrl);
            }
            let port = port.parse::<u16>().map_err(|_| HttpError::InvalidUrl)?;
            (host, port)
        }
        None => (authority, scheme.default_port()),
    };
    if host.is_empty() {
        return Err(HttpError::InvalidUrl);
    }

    let path = if path_and_query.starts_with('/') {
        path_and_query.to_string()
    } else {
        // No path: default to `/`, keeping a bare query attached to it.
        format!("/{path_and_query}")
    };

    Ok(ParsedUrl {
        scheme,
        host: host.to_string(),
        port,
        path,
    })
}
