//! API constants

/// API base path prefix
pub const API_BASE: &str = "/api";

/// Path static assets are served under.
pub const ASSETS_PATH: &str = "/assets";

/// Room for multipart boundaries and part headers on top of the file size
/// ceiling when sizing the route body limit.
pub const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Issuer every access token must carry.
pub const TOKEN_ISSUER: &str = "tubely-access";
