//! Request rewriting and hand-off to the next stage.

use http::header::ACCEPT;
use http::Uri;
use pingora_http::RequestHeader;

use crate::error::ProxyError;

/// Outcome of a successful translation, ready to apply to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// imgproxy path that replaces the request target (no query string)
    pub path: String,
    /// Drop the `Accept` header so imgproxy keeps the source format
    pub strip_accept: bool,
}

/// The collaborator that receives the rewritten request.
///
/// Any `FnOnce(&mut RequestHeader) -> T` is a next stage, which keeps tests
/// free of a running server.
pub trait NextStage {
    type Output;

    fn forward(self, req: &mut RequestHeader) -> Self::Output;
}

impl<F, T> NextStage for F
where
    F: FnOnce(&mut RequestHeader) -> T,
{
    type Output = T;

    fn forward(self, req: &mut RequestHeader) -> T {
        self(req)
    }
}

/// Replaces the request target and applies header side effects.
pub fn apply(rewrite: &Rewrite, req: &mut RequestHeader) -> Result<(), ProxyError> {
    let uri: Uri = to_request_target(&rewrite.path)
        .parse()
        .map_err(|e: http::uri::InvalidUri| {
            ProxyError::Internal(format!("Invalid rewritten URI '{}': {}", rewrite.path, e))
        })?;
    req.set_uri(uri);

    if rewrite.strip_accept {
        req.remove_header(&ACCEPT);
    }

    Ok(())
}

/// Percent-encodes bytes that cannot appear in an origin-form path.
///
/// `%` passes through untouched because file names are already encoded;
/// `?` and `#` in source directories are encoded so they stay in the path.
fn to_request_target(path: &str) -> String {
    let mut target = String::with_capacity(path.len());
    for byte in path.bytes() {
        if is_path_byte(byte) {
            target.push(byte as char);
        } else {
            target.push_str(&format!("%{:02X}", byte));
        }
    }
    target
}

fn is_path_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'-' | b'.'
                | b'_'
                | b'~'
                | b'!'
                | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b';'
                | b'='
                | b':'
                | b'@'
                | b'/'
                | b'%'
        )
}
