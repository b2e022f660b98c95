//! Dispatch planning.
//!
//! Planning is separated from execution: given the loaded recipient
//! profiles and the request flags, [`plan_dispatch`] decides which channel
//! attempts each recipient gets. The executor then runs the plan against
//! the real senders. Channel eligibility is toggle AND valid contact data;
//! a recipient with WhatsApp enabled but an unusable phone number simply
//! gets no WhatsApp attempt.

use uuid::Uuid;

use crate::modules::notifications::model::RecipientProfile;
use crate::utils::phone::normalize_msisdn;

/// Channels the caller asked for on this dispatch.
#[derive(Debug, Clone, Copy)]
pub struct DispatchFlags {
    pub sms: bool,
    pub whatsapp: bool,
    pub push: bool,
}

/// The attempts planned for one recipient. The in-app insert is not part
/// of the plan: it happens unconditionally for every recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientPlan {
    pub account_id: Uuid,
    pub sms_to: Option<String>,
    pub whatsapp_to: Option<String>,
    pub push: bool,
}

pub fn plan_recipient(
    profile: &RecipientProfile,
    flags: &DispatchFlags,
    country_code: &str,
) -> RecipientPlan {
    let normalized_phone = profile
        .phone
        .as_deref()
        .and_then(|p| normalize_msisdn(p, country_code));

    RecipientPlan {
        account_id: profile.account_id,
        sms_to: (flags.sms && profile.sms_notifications)
            .then(|| normalized_phone.clone())
            .flatten(),
        whatsapp_to: (flags.whatsapp && profile.whatsapp_notifications)
            .then(|| normalized_phone)
            .flatten(),
        push: flags.push && profile.push_notifications,
    }
}

pub fn plan_dispatch(
    profiles: &[RecipientProfile],
    flags: &DispatchFlags,
    country_code: &str,
) -> Vec<RecipientPlan> {
    profiles
        .iter()
        .map(|profile| plan_recipient(profile, flags, country_code))
        .collect()
}
