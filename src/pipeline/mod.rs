// Request pipeline module - per-request context carried through the proxy phases

use std::time::{Duration, Instant};
use uuid::Uuid;

/// Request context that holds what the proxy learns about one HTTP request
/// as it moves from `request_filter` to `logging`
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    method: String,
    path: String,
    started_at: Instant,
    upstream_path: Option<String>,
    rejected_stage: Option<&'static str>,
}

impl RequestContext {
    /// Create a new RequestContext from HTTP request information
    /// Automatically generates a unique request ID (UUID v4) and starts the clock
    pub fn new(method: String, path: String) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            method,
            path,
            started_at: Instant::now(),
            upstream_path: None,
            rejected_stage: None,
        }
    }

    /// Fill in request line details once the header has been read
    pub fn set_request(&mut self, method: &str, path: &str) {
        self.method = method.to_string();
        self.path = path.to_string();
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Path as received, before any rewrite
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Record the imgproxy path the request was rewritten to
    pub fn set_upstream_path(&mut self, upstream_path: String) {
        self.upstream_path = Some(upstream_path);
    }

    pub fn upstream_path(&self) -> Option<&str> {
        self.upstream_path.as_deref()
    }

    /// Record which pipeline stage rejected the request
    pub fn set_rejected_stage(&mut self, stage: &'static str) {
        self.rejected_stage = Some(stage);
    }

    pub fn rejected_stage(&self) -> Option<&'static str> {
        self.rejected_stage
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new("GET".to_string(), "/".to_string())
    }
}
