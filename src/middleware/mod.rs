//! Authentication and authorization middleware.
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`auth::AuthUser`] validates the JWT and extracts claims (401 on failure)
//! 3. [`role`] gates check the role grant embedded in the claims (403 on failure)

pub mod auth;
pub mod role;
