//! Dragonfly to imgproxy translation engine
//!
//! Request flow, strictly linear:
//! ```text
//! path + query
//!     → matcher.rs   (payload, sha, convert)
//!     → job.rs       (base64url → JSON → JobList)
//!     → signature.rs (HMAC-SHA256, must match before anything else runs)
//!     → translate.rs (JobList → /insecure/.../plain/...)
//!     → rewrite.rs   (mutate request, hand to next stage)
//! ```
//!
//! Any failure stops the flow; the next stage is never invoked.

pub mod job;
pub mod matcher;
pub mod rewrite;
pub mod signature;
pub mod translate;

pub use job::{decode_jobs, encode_jobs, Job, JobList};
pub use rewrite::{NextStage, Rewrite};
pub use signature::{sign, verify};
pub use translate::{translate, SizeSpec};

use pingora_http::RequestHeader;

use crate::config::DragonflyConfig;
use crate::error::ProxyError;

/// Verifies and translates Dragonfly requests
///
/// Holds only immutable configuration, so one instance is shared by all
/// worker threads.
#[derive(Debug, Clone)]
pub struct DragonflyEngine {
    secret: String,
    url_prefix: String,
}

impl DragonflyEngine {
    /// Fails when the signing secret is empty.
    pub fn new(config: &DragonflyConfig) -> Result<Self, ProxyError> {
        if config.secret.is_empty() {
            return Err(ProxyError::Config("DragonflySecret required".to_string()));
        }

        Ok(Self {
            secret: config.secret.clone(),
            url_prefix: config.url_prefix.clone(),
        })
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Runs matcher, decoder, verifier and translator for one request target.
    pub fn rewrite_for(&self, path: &str, query: Option<&str>) -> Result<Rewrite, ProxyError> {
        let payload = matcher::extract_payload(path)?;
        let params = matcher::parse_query(query);
        let supplied = matcher::extract_signature(&params)?;

        let jobs = decode_jobs(payload)?;
        verify(&self.secret, &jobs, supplied)?;

        Ok(Rewrite {
            path: translate(&self.url_prefix, &jobs)?,
            strip_accept: matcher::content_negotiation_disabled(&params),
        })
    }

    /// Rewrites the request in place, then forwards it to `next`.
    pub fn handle<N: NextStage>(
        &self,
        req: &mut RequestHeader,
        next: N,
    ) -> Result<N::Output, ProxyError> {
        let rewrite = self.rewrite_for(req.uri.path(), req.uri.query())?;

        if rewrite.strip_accept {
            tracing::debug!("convert=false, dropping Accept header");
        }
        rewrite::apply(&rewrite, req)?;

        tracing::info!(upstream_path = %rewrite.path, "Generated imgproxy URL");

        Ok(next.forward(req))
    }
}
