//! Browser-like request header values.
//!
//! Every outbound GET carries the same fixed header set so listing and detail
//! requests look like an ordinary browser navigation.

/// Accept header value
pub const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
/// Accept-Language header value
pub const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.5";
/// Connection header value
pub const CONNECTION_VALUE: &str = "keep-alive";
/// Upgrade-Insecure-Requests header value
pub const UPGRADE_INSECURE_REQUESTS_VALUE: &str = "1";
/// Cache-Control header value
pub const CACHE_CONTROL_VALUE: &str = "max-age=0";
