//! Wire serialization and parsing of header blocks.
//!
//! # Design
//! Header names are kept exactly as supplied and as received: no case
//! folding, no canonical ordering. Serialization walks the map in its
//! natural iteration order, so callers must not depend on on-wire ordering;
//! parsing resolves duplicate names last-occurrence-wins.

use std::collections::HashMap;

/// Render a header map as consecutive `Name: Value\r\n` lines.
///
/// An empty map yields an empty string; the transport skips attaching an
/// empty block rather than sending one.
pub fn serialize(headers: &HashMap<String, String>) -> String {
    let mut block = String::new();
    for (name, value) in headers {
        block.push_str(name);
        block.push_str(": ");
        block.push_str(value);
        block.push_str("\r\n");
    }
    block
}

/// Parse a raw response head (status line plus header lines) into a map.
///
/// The status line is discarded. Each remaining non-blank line is split at
/// the first `:`; key and value are trimmed of spaces, tabs, CR and LF.
/// Lines without a `:` are skipped. Duplicate names: last occurrence wins.
pub fn parse(raw: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    for line in raw.lines().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_string(), value.trim().to_string());
        }
    }
    headers
}
