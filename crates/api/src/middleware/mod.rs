//! Request extractors for authentication.
//!
//! - [`auth::AuthUser`] -- resolves the caller from a Bearer token.
//!
//! Role and assignment checks are not extractors: handlers call
//! [`bitchore_core::access::authorize`] with the action they perform.

pub mod auth;
