//! Delivery channel integrations.
//!
//! Each sender is a thin client over one provider: [`email`] over SMTP,
//! [`sms`] and [`whatsapp`] over a Twilio-compatible HTTP API, and [`push`]
//! over the stored web-push endpoints. SMS, WhatsApp, and push are
//! best-effort: a failed send is logged and reported as `false`, never as
//! an error, so one recipient or channel cannot abort a fan-out.

pub mod email;
pub mod push;
pub mod sms;
pub mod whatsapp;
