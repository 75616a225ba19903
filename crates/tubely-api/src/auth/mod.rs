//! Authentication: bearer token verification and the `AuthUser` extractor.

pub mod jwt;
pub mod models;

pub use jwt::{extract_bearer, issue_access_token, verify_access_token};
pub use models::AuthUser;
