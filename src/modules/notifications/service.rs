use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, instrument, warn};
use uuid::Uuid;

use crate::channels::email::Mailer;
use crate::channels::push::{PushPayload, PushSender, PushSubscription};
use crate::channels::sms::SmsSender;
use crate::channels::whatsapp::WhatsAppSender;
use crate::modules::notifications::dispatch::{DispatchFlags, RecipientPlan, plan_dispatch};
use crate::modules::notifications::model::{
    Channel, ClassNotificationRequest, ClassNotificationResponse, DeliveryOutcome,
    DirectNotificationRequest, DirectNotificationResponse, RecipientOutcome, RecipientProfile,
};
use crate::utils::errors::AppError;

/// Upper bound on concurrent recipient deliveries. Recipients are
/// independent; the bound protects the messaging providers and the pool.
const MAX_IN_FLIGHT: usize = 8;

pub struct NotificationService;

impl NotificationService {
    /// Resolves a class to its student account ids, optionally including
    /// the linked parent accounts.
    #[instrument(skip(db))]
    pub async fn resolve_class_recipients(
        db: &PgPool,
        class_id: Uuid,
        include_parents: bool,
    ) -> Result<Vec<Uuid>, AppError> {
        let students: Vec<(Uuid,)> =
            sqlx::query_as("SELECT account_id FROM students WHERE class_id = $1")
                .bind(class_id)
                .fetch_all(db)
                .await
                .context("Failed to resolve class students")
                .map_err(AppError::database)?;

        let mut recipients: Vec<Uuid> = students.into_iter().map(|row| row.0).collect();

        if include_parents && !recipients.is_empty() {
            let parents: Vec<(Uuid,)> = sqlx::query_as(
                "SELECT DISTINCT parent_account_id
                 FROM student_parents
                 WHERE student_account_id = ANY($1)",
            )
            .bind(recipients.clone())
            .fetch_all(db)
            .await
            .context("Failed to resolve linked parents")
            .map_err(AppError::database)?;

            recipients.extend(parents.into_iter().map(|row| row.0));
        }

        Ok(recipients)
    }

    /// Loads the profiles for a recipient set. Accounts without a profile
    /// are logged and dropped; a missing profile never fails the batch.
    #[instrument(skip(db, account_ids), fields(requested = account_ids.len()))]
    pub async fn load_profiles(
        db: &PgPool,
        account_ids: &[Uuid],
    ) -> Result<Vec<RecipientProfile>, AppError> {
        if account_ids.is_empty() {
            return Ok(Vec::new());
        }

        let profiles = sqlx::query_as::<_, RecipientProfile>(
            "SELECT account_id, full_name, email, phone,
                    email_notifications, sms_notifications,
                    whatsapp_notifications, push_notifications
             FROM profiles
             WHERE account_id = ANY($1)",
        )
        .bind(account_ids.to_vec())
        .fetch_all(db)
        .await
        .context("Failed to load recipient profiles")
        .map_err(AppError::database)?;

        let found: HashSet<Uuid> = profiles.iter().map(|p| p.account_id).collect();
        for account_id in account_ids {
            if !found.contains(account_id) {
                warn!(%account_id, "Recipient has no profile, skipping");
            }
        }

        Ok(profiles)
    }

    /// Sends a class-scoped announcement: one batched email broadcast to
    /// the opted-in recipients, plus one in-app row per recipient. The
    /// in-app rows are written even when the broadcast fails.
    #[instrument(skip(db, mailer, req), fields(class_id = %req.class_id))]
    pub async fn notify_class(
        db: &PgPool,
        mailer: &Mailer,
        req: ClassNotificationRequest,
    ) -> Result<ClassNotificationResponse, AppError> {
        let recipients =
            Self::resolve_class_recipients(db, req.class_id, req.notify_parents).await?;
        let profiles = Self::load_profiles(db, &recipients).await?;

        let addresses: Vec<String> = profiles
            .iter()
            .filter(|p| p.email_notifications)
            .filter_map(|p| p.email.clone())
            .collect();

        let mut emails_sent = 0;
        if !addresses.is_empty() {
            let html_body = mailer.notification_template(&req.title, &req.details);
            let text_body = format!("{}\n\n{}", req.title, req.details);
            match mailer
                .send_broadcast(&addresses, &req.title, &text_body, &html_body)
                .await
            {
                // The provider accepts or rejects the batch as a whole, so
                // the counter covers all addresses or none.
                Ok(()) if mailer.enabled() => emails_sent = addresses.len(),
                Ok(()) => {}
                Err(e) => error!(error = %e.error, "Email broadcast failed"),
            }
        }

        let mut in_app_created = 0;
        for profile in &profiles {
            match Self::insert_in_app(
                db,
                profile.account_id,
                &req.title,
                &req.details,
                &req.kind,
                None,
            )
            .await
            {
                Ok(()) => in_app_created += 1,
                Err(e) => {
                    error!(account_id = %profile.account_id, error = %e.error,
                        "Failed to insert in-app notification");
                }
            }
        }

        Ok(ClassNotificationResponse {
            success: true,
            emails_sent,
            in_app_created,
        })
    }

    /// Fans a message out to an explicit recipient list over SMS, WhatsApp,
    /// and push, recording one in-app row per recipient. Recipients are
    /// processed concurrently with a bounded number in flight; no channel
    /// failure aborts another recipient or channel.
    #[instrument(skip_all, fields(recipients = req.account_ids.len(), kind = %req.kind))]
    pub async fn notify_direct(
        db: &PgPool,
        sms_sender: &SmsSender,
        whatsapp_sender: &WhatsAppSender,
        push_sender: &PushSender,
        country_code: &str,
        req: DirectNotificationRequest,
    ) -> Result<DirectNotificationResponse, AppError> {
        let profiles = Self::load_profiles(db, &req.account_ids).await?;
        let flags = DispatchFlags {
            sms: req.send_sms,
            whatsapp: req.send_whatsapp,
            push: req.send_push,
        };
        let plans = plan_dispatch(&profiles, &flags, country_code);

        let semaphore = Arc::new(Semaphore::new(MAX_IN_FLIGHT));
        let mut tasks: JoinSet<Vec<RecipientOutcome>> = JoinSet::new();

        for plan in plans {
            let semaphore = Arc::clone(&semaphore);
            let db = db.clone();
            let sms_sender = sms_sender.clone();
            let whatsapp_sender = whatsapp_sender.clone();
            let push_sender = push_sender.clone();
            let title = req.title.clone();
            let body = req.body.clone();
            let kind = req.kind.clone();
            let icon = req.icon.clone();
            let url = req.url.clone();

            tasks.spawn(async move {
                // The semaphore is never closed while tasks are running.
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("dispatch semaphore closed");

                Self::deliver_to_recipient(
                    &db,
                    &sms_sender,
                    &whatsapp_sender,
                    &push_sender,
                    plan,
                    &title,
                    &body,
                    &kind,
                    icon,
                    url,
                )
                .await
            });
        }

        let mut results: Vec<RecipientOutcome> = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(mut outcomes) => results.append(&mut outcomes),
                Err(e) => error!(error = %e, "Recipient dispatch task panicked"),
            }
        }

        let sent = |channel: Channel| {
            results
                .iter()
                .filter(|r| r.channel == channel && r.outcome == DeliveryOutcome::Sent)
                .count()
        };

        Ok(DirectNotificationResponse {
            success: true,
            sms_sent: sent(Channel::Sms),
            whatsapp_sent: sent(Channel::Whatsapp),
            push_sent: sent(Channel::Push),
            in_app_created: sent(Channel::InApp),
            results,
        })
    }

    #[allow(clippy::too_many_arguments)]
    async fn deliver_to_recipient(
        db: &PgPool,
        sms_sender: &SmsSender,
        whatsapp_sender: &WhatsAppSender,
        push_sender: &PushSender,
        plan: RecipientPlan,
        title: &str,
        body: &str,
        kind: &str,
        icon: Option<String>,
        url: Option<String>,
    ) -> Vec<RecipientOutcome> {
        let mut outcomes = Vec::new();
        let account_id = plan.account_id;

        if let Some(to) = &plan.sms_to {
            let message = format!("{}: {}", title, body);
            let accepted = sms_sender.send(to, &message).await;
            outcomes.push(outcome(account_id, Channel::Sms, accepted));
        }

        if let Some(to) = &plan.whatsapp_to {
            let message = format!("*{}*\n{}", title, body);
            let accepted = whatsapp_sender.send(to, &message).await;
            outcomes.push(outcome(account_id, Channel::Whatsapp, accepted));
        }

        if plan.push {
            match Self::load_push_subscriptions(db, account_id).await {
                Ok(subscriptions) if !subscriptions.is_empty() => {
                    let payload = PushPayload {
                        title: title.to_string(),
                        body: body.to_string(),
                        icon,
                        url: url.clone(),
                    };
                    let mut any_accepted = false;
                    for subscription in &subscriptions {
                        if push_sender.send(subscription, &payload).await {
                            any_accepted = true;
                        }
                    }
                    outcomes.push(outcome(account_id, Channel::Push, any_accepted));
                }
                Ok(_) => {
                    outcomes.push(RecipientOutcome {
                        account_id,
                        channel: Channel::Push,
                        outcome: DeliveryOutcome::Skipped,
                    });
                }
                Err(e) => {
                    error!(%account_id, error = %e.error, "Failed to load push subscriptions");
                    outcomes.push(outcome(account_id, Channel::Push, false));
                }
            }
        }

        // The in-app row is the authoritative record; it is written
        // regardless of how the external channels fared.
        let inserted =
            Self::insert_in_app(db, account_id, title, body, kind, url.as_deref()).await;
        match inserted {
            Ok(()) => outcomes.push(outcome(account_id, Channel::InApp, true)),
            Err(e) => {
                error!(%account_id, error = %e.error, "Failed to insert in-app notification");
                outcomes.push(outcome(account_id, Channel::InApp, false));
            }
        }

        outcomes
    }

    pub async fn insert_in_app(
        db: &PgPool,
        account_id: Uuid,
        title: &str,
        body: &str,
        kind: &str,
        link: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO notifications (account_id, title, body, kind, link)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(account_id)
        .bind(title)
        .bind(body)
        .bind(kind)
        .bind(link)
        .execute(db)
        .await
        .context("Failed to insert notification")
        .map_err(AppError::database)?;

        Ok(())
    }

    async fn load_push_subscriptions(
        db: &PgPool,
        account_id: Uuid,
    ) -> Result<Vec<PushSubscription>, AppError> {
        let subscriptions = sqlx::query_as::<_, PushSubscription>(
            "SELECT endpoint, p256dh, auth FROM push_subscriptions WHERE account_id = $1",
        )
        .bind(account_id)
        .fetch_all(db)
        .await
        .context("Failed to load push subscriptions")
        .map_err(AppError::database)?;

        Ok(subscriptions)
    }
}

fn outcome(account_id: Uuid, channel: Channel, accepted: bool) -> RecipientOutcome {
    RecipientOutcome {
        account_id,
        channel,
        outcome: if accepted {
            DeliveryOutcome::Sent
        } else {
            DeliveryOutcome::Failed
        },
    }
}
