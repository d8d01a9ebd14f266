//! Destination extraction.
//!
//! # Design Decisions
//! - Prefix matching is case-sensitive and literal
//! - The remainder is passed through verbatim: no percent-decoding,
//!   no scheme or URL checks
//! - An empty remainder is not an error here; handlers reject it

use crate::error::ProxyError;

/// Literal prefix every proxied request-target must start with.
pub const PROXY_PREFIX: &str = "/proxy/";

/// Extract the destination URL from a raw request-target.
///
/// `"/proxy/http://example.test/a?b=1"` yields `"http://example.test/a?b=1"`.
pub fn extract_destination(path: &str) -> Result<&str, ProxyError> {
    path.strip_prefix(PROXY_PREFIX).ok_or(ProxyError::UnknownPath)
}
