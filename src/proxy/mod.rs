// Proxy module - Pingora ProxyHttp implementation
// Verifies Dragonfly job URLs, rewrites them and forwards to imgproxy

use async_trait::async_trait;
use pingora_core::upstreams::peer::HttpPeer;
use pingora_core::Result;
use pingora_http::RequestHeader;
use pingora_proxy::{ProxyHttp, Session};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub mod helpers;
pub mod special_endpoints;

use crate::config::{Config, UpstreamConfig};
use crate::dragonfly::DragonflyEngine;
use crate::error::{ErrorStatusMode, ProxyError};
use crate::pipeline::RequestContext;

use helpers::{set_host, upstream_host_header, write_response};
use special_endpoints::{handle_health, handle_rejection, HEALTH_PATH};

/// DragonflyProxy implements the Pingora ProxyHttp trait
/// Handles signature verification, URL translation and imgproxy forwarding
pub struct DragonflyProxy {
    engine: Arc<DragonflyEngine>,
    upstream: UpstreamConfig,
    error_status: ErrorStatusMode,
    /// Proxy start time (for uptime calculation in /health endpoint)
    start_time: Instant,
}

impl DragonflyProxy {
    /// Create a new DragonflyProxy instance from configuration
    pub fn new(config: &Config) -> std::result::Result<Self, ProxyError> {
        let engine = DragonflyEngine::new(&config.dragonfly)?;

        Ok(Self {
            engine: Arc::new(engine),
            upstream: config.upstream.clone(),
            error_status: config.server.error_status,
            start_time: Instant::now(),
        })
    }

    pub fn engine(&self) -> Arc<DragonflyEngine> {
        Arc::clone(&self.engine)
    }

    fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.timeout_secs)
    }
}

#[async_trait]
impl ProxyHttp for DragonflyProxy {
    type CTX = RequestContext;

    /// Create a new request context for each incoming request
    fn new_ctx(&self) -> Self::CTX {
        RequestContext::default()
    }

    /// Answer /health directly, otherwise verify and rewrite the request
    async fn request_filter(&self, session: &mut Session, ctx: &mut Self::CTX) -> Result<bool> {
        {
            let req = session.req_header();
            ctx.set_request(req.method.as_str(), req.uri.path());
        }

        if ctx.path() == HEALTH_PATH {
            write_response(session, handle_health(self.start_time)).await?;
            return Ok(true);
        }

        let outcome = self
            .engine
            .handle(session.req_header_mut(), |req: &mut RequestHeader| {
                req.uri.path().to_string()
            });

        match outcome {
            Ok(upstream_path) => {
                tracing::debug!(
                    request_id = %ctx.request_id(),
                    path = %ctx.path(),
                    upstream_path = %upstream_path,
                    "Request rewritten"
                );
                ctx.set_upstream_path(upstream_path);
                Ok(false) // Continue to upstream
            }
            Err(err) => {
                tracing::warn!(
                    request_id = %ctx.request_id(),
                    path = %ctx.path(),
                    stage = err.stage(),
                    error = %err,
                    "Rejecting request"
                );
                ctx.set_rejected_stage(err.stage());

                write_response(session, handle_rejection(&err, self.error_status)).await?;
                Ok(true) // Request handled
            }
        }
    }

    /// The configured imgproxy instance
    async fn upstream_peer(
        &self,
        _session: &mut Session,
        ctx: &mut Self::CTX,
    ) -> Result<Box<HttpPeer>> {
        if ctx.upstream_path().is_none() {
            return Err(pingora_core::Error::explain(
                pingora_core::ErrorType::InternalError,
                "Request reached upstream selection without a rewrite",
            ));
        }

        let mut peer = Box::new(HttpPeer::new(
            (self.upstream.host.clone(), self.upstream.port),
            self.upstream.tls,
            self.upstream.host.clone(),
        ));

        let timeout = self.upstream_timeout();
        peer.options.connection_timeout = Some(timeout);
        peer.options.read_timeout = Some(timeout);
        peer.options.write_timeout = Some(timeout);

        Ok(peer)
    }

    /// Point the Host header at imgproxy
    async fn upstream_request_filter(
        &self,
        _session: &mut Session,
        upstream_request: &mut RequestHeader,
        _ctx: &mut Self::CTX,
    ) -> Result<()> {
        set_host(
            upstream_request,
            upstream_host_header(&self.upstream.host, self.upstream.port, self.upstream.tls),
        )
    }

    /// Log request completion
    async fn logging(
        &self,
        session: &mut Session,
        e: Option<&pingora_core::Error>,
        ctx: &mut Self::CTX,
    ) {
        let status = session
            .response_written()
            .map(|resp| resp.status.as_u16())
            .unwrap_or(0);

        tracing::info!(
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = %ctx.path(),
            upstream_path = ctx.upstream_path().unwrap_or("-"),
            rejected_stage = ctx.rejected_stage().unwrap_or("-"),
            status = status,
            duration_ms = ctx.elapsed().as_millis() as u64,
            error = %e.map(|err| err.to_string()).unwrap_or_default(),
            "Request completed"
        );
    }
}
