pub mod accounts;
pub mod auth;
pub mod notifications;
