//! Pattern matcher for Dragonfly media URLs.
//!
//! Locates the encoded job payload in `/media/<payload>[.<ext>]` and pulls
//! the wire parameters out of the query string. Nothing here allocates a
//! regex per request.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::constants::{CONVERT_PARAM, IMAGE_EXTENSIONS, MEDIA_PATH_SEGMENT, SIGNATURE_PARAM};
use crate::error::ProxyError;

static MEDIA_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Gets the compiled media path regex.
///
/// The payload is matched lazily so that a trailing, allow-listed image
/// extension is not swallowed into it.
fn media_pattern() -> &'static Regex {
    MEDIA_PATTERN.get_or_init(|| {
        let extensions = IMAGE_EXTENSIONS.join("|");
        let pattern = format!(
            r"{}(.+?)(?:\.(?:{}))*$",
            regex::escape(MEDIA_PATH_SEGMENT),
            extensions
        );
        // SAFETY: built from compile-time constants, covered by tests.
        Regex::new(&pattern).expect("Invalid media path regex - this is a compile-time bug")
    })
}

/// Extracts the encoded job payload from the request path.
pub fn extract_payload(path: &str) -> Result<&str, ProxyError> {
    media_pattern()
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(ProxyError::Extraction)
}

/// Parses a raw query string into decoded key-value pairs.
///
/// Keys and values are both form-decoded (`+` is a space). Later duplicates
/// lose to the first occurrence.
pub fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if let Some(query) = query {
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params
                .entry(form_decode(key))
                .or_insert_with(|| form_decode(value));
        }
    }
    params
}

fn form_decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_default()
}

/// Returns the signature supplied on the wire.
pub fn extract_signature(params: &HashMap<String, String>) -> Result<&str, ProxyError> {
    params
        .get(SIGNATURE_PARAM)
        .map(String::as_str)
        .filter(|sha| !sha.is_empty())
        .ok_or(ProxyError::MissingSignature)
}

/// True when the client explicitly asked to skip content negotiation.
pub fn content_negotiation_disabled(params: &HashMap<String, String>) -> bool {
    params.get(CONVERT_PARAM).is_some_and(|v| v == "false")
}
