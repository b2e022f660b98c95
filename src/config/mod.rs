//! Environment-driven configuration.
//!
//! Each submodule owns one concern and exposes a `from_env()` constructor:
//!
//! - [`cors`]: Allowed origins for the CORS layer
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`email`]: SMTP transport settings
//! - [`identity`]: Login identifier domain
//! - [`jwt`]: Token secret and expiry settings
//! - [`messaging`]: SMS/WhatsApp provider credentials and country code default

pub mod cors;
pub mod database;
pub mod email;
pub mod identity;
pub mod jwt;
pub mod messaging;
