//! Shared utilities.
//!
//! - [`errors`]: Application error type and handling
//! - [`jwt`]: JWT token creation and verification
//! - [`password`]: Password hashing and verification
//! - [`phone`]: Phone number normalization for messaging providers

pub mod errors;
pub mod jwt;
pub mod password;
pub mod phone;
