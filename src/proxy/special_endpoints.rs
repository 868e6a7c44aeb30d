//! Response generators for built-in endpoints and rejections.
//!
//! Functions return `EndpointResponse` instead of writing directly to the
//! session, which keeps response generation testable. The caller writes the
//! response with `helpers::write_response`.

use std::time::Instant;

use crate::error::{ErrorStatusMode, ProxyError};

/// Path answered by the proxy itself instead of the pipeline
pub const HEALTH_PATH: &str = "/health";

/// Response from a special endpoint handler.
#[derive(Debug, Clone)]
pub struct EndpointResponse {
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value
    pub content_type: &'static str,
    /// Response body
    pub body: String,
}

impl EndpointResponse {
    /// Create a JSON response with the given status and body.
    pub fn json(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "application/json",
            body,
        }
    }

    /// Create a plain text response.
    pub fn text(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body,
        }
    }
}

/// Generate response for /health endpoint.
///
/// Returns health status with uptime and version information.
pub fn handle_health(start_time: Instant) -> EndpointResponse {
    let body = serde_json::json!({
        "status": "healthy",
        "uptime_seconds": start_time.elapsed().as_secs(),
        "version": env!("CARGO_PKG_VERSION")
    })
    .to_string();

    EndpointResponse::json(200, body)
}

/// Plain text rejection naming the failing stage.
pub fn handle_rejection(err: &ProxyError, mode: ErrorStatusMode) -> EndpointResponse {
    EndpointResponse::text(err.to_http_status(mode), err.to_string())
}
