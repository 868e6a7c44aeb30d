// Error types module

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Centralized error type for the proxy
///
/// One variant per pipeline stage that can reject a request, plus the
/// configuration and internal categories. Every variant is terminal: the
/// request is answered directly and never forwarded upstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// The request path does not look like `/media/<payload>[.<ext>]`
    #[error("Failed to extract base64 string from URL")]
    Extraction,

    /// No `sha` query parameter was supplied
    #[error("Failed to get sha from query string")]
    MissingSignature,

    /// The payload is not base64url, not JSON, or not an array of string arrays
    #[error("Failed to decode job list: {reason}")]
    Decode { reason: String },

    /// The recomputed signature differs from the supplied one
    #[error("SHA validate failed")]
    SignatureMismatch,

    /// A thumb job carries a size spec that cannot be parsed
    #[error("Failed to parse thumb size spec '{spec}'")]
    SizeSpec { spec: String },

    /// Configuration errors (missing secret, invalid YAML, missing env vars)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal proxy errors (unrepresentable rewritten URI, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// How pipeline errors are mapped to HTTP status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStatusMode {
    /// Every error is answered with 500, matching existing deployments
    #[default]
    Legacy,
    /// Malformed input is 400, a bad signature is 403, internal faults are 500
    Strict,
}

impl ProxyError {
    pub fn decode(reason: impl Into<String>) -> Self {
        ProxyError::Decode {
            reason: reason.into(),
        }
    }

    pub fn size_spec(spec: impl Into<String>) -> Self {
        ProxyError::SizeSpec { spec: spec.into() }
    }

    /// Pipeline stage name for logging
    pub fn stage(&self) -> &'static str {
        match self {
            ProxyError::Extraction | ProxyError::MissingSignature => "pattern_matcher",
            ProxyError::Decode { .. } => "job_decoder",
            ProxyError::SignatureMismatch => "signature_verifier",
            ProxyError::SizeSpec { .. } => "url_translator",
            ProxyError::Config(_) => "config",
            ProxyError::Internal(_) => "request_rewriter",
        }
    }

    /// Maps the error to an HTTP status code
    ///
    /// Status mapping in strict mode:
    /// - Extraction, MissingSignature, Decode, SizeSpec → 400 (Bad Request)
    /// - SignatureMismatch → 403 (Forbidden)
    /// - Config, Internal → 500 (Internal Server Error)
    ///
    /// Legacy mode answers 500 for everything.
    pub fn to_http_status(&self, mode: ErrorStatusMode) -> u16 {
        match mode {
            ErrorStatusMode::Legacy => 500,
            ErrorStatusMode::Strict => match self {
                ProxyError::Extraction
                | ProxyError::MissingSignature
                | ProxyError::Decode { .. }
                | ProxyError::SizeSpec { .. } => 400,
                ProxyError::SignatureMismatch => 403,
                ProxyError::Config(_) | ProxyError::Internal(_) => 500,
            },
        }
    }
}
