// Constants module - wire names and default values
//
// Wire-level names are shared with Dragonfly issuers and the imgproxy
// backend, so they must not change without coordinating both sides.

// =============================================================================
// Inbound (Dragonfly) wire names
// =============================================================================

/// Query parameter carrying the truncated HMAC of the job list
pub const SIGNATURE_PARAM: &str = "sha";

/// Query parameter that disables content negotiation when set to `false`
pub const CONVERT_PARAM: &str = "convert";

/// Path segment that introduces an encoded job payload
pub const MEDIA_PATH_SEGMENT: &str = "/media/";

/// Decorative file extensions accepted after the payload
pub const IMAGE_EXTENSIONS: &[&str] = &["gif", "png", "jpeg", "jpg", "webp", "avif"];

/// Number of hex characters kept from the HMAC-SHA256 digest
pub const SIGNATURE_HEX_LEN: usize = 16;

// =============================================================================
// Job tags
// =============================================================================

/// Tag of a fetch job: `["f", path]`
pub const FETCH_TAG: &str = "f";

/// Tag of a process job: `["p", operation, ...]`
pub const PROCESS_TAG: &str = "p";

/// The only process operation that is translated
pub const THUMB_OPERATION: &str = "thumb";

// =============================================================================
// Outbound (imgproxy) directives
// =============================================================================

/// Leading segment for unsigned imgproxy URLs
pub const INSECURE_SEGMENT: &str = "/insecure";

/// Marker that introduces a plain (non-base64) source URL
pub const PLAIN_SEGMENT: &str = "/plain/";

/// Forced GIF output directive
pub const FORMAT_GIF_DIRECTIVE: &str = "/f:gif";

/// Forced SVG output directive
pub const FORMAT_SVG_DIRECTIVE: &str = "/f:svg";

// =============================================================================
// Server defaults
// =============================================================================

/// Default listen address
pub const DEFAULT_ADDRESS: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 8080;

/// Default upstream (imgproxy) port
pub const DEFAULT_UPSTREAM_PORT: u16 = 8080;

/// Default upstream connect/read/write timeout in seconds
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Default log filter when RUST_LOG is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";
