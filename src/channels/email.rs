use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{info, instrument};

use crate::config::email::EmailConfig;
use crate::utils::errors::AppError;

/// SMTP broadcast sender. Batches all recipients into a single BCC'd
/// message; the whole batch succeeds or fails together.
#[derive(Debug, Clone)]
pub struct Mailer {
    config: EmailConfig,
}

impl Mailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    #[instrument(skip(self, html_body, text_body), fields(recipients = recipients.len()))]
    pub async fn send_broadcast(
        &self,
        recipients: &[String],
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        if recipients.is_empty() {
            return Ok(());
        }

        if !self.config.enabled {
            info!("SMTP disabled, skipping broadcast");
            return Ok(());
        }

        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let mut builder = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid from email: {}", e)))?,
            )
            // Self-addressed; the audience goes on BCC.
            .to(self
                .config
                .from_email
                .parse()
                .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid from email: {}", e)))?)
            .subject(subject);

        for recipient in recipients {
            let mailbox = recipient.parse().map_err(|e| {
                AppError::bad_request(anyhow::anyhow!("Invalid recipient {}: {}", recipient, e))
            })?;
            builder = builder.bcc(mailbox);
        }

        let email = builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal(anyhow::anyhow!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal(anyhow::anyhow!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to send email: {}", e)))?;

        Ok(())
    }

    /// Renders the notification HTML body.
    pub fn notification_template(&self, title: &str, details: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{}</title>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <table width="100%" cellpadding="0" cellspacing="0" style="padding: 20px;">
        <tr>
            <td align="center">
                <table width="600" cellpadding="0" cellspacing="0" style="background-color: #ffffff; border-radius: 8px; overflow: hidden;">
                    <tr>
                        <td style="background-color: #0F766E; padding: 24px; text-align: center;">
                            <h1 style="margin: 0; color: #ffffff; font-size: 24px;">{}</h1>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 30px;">
                            <h2 style="margin: 0 0 16px 0; color: #333333; font-size: 20px;">{}</h2>
                            <p style="margin: 0; color: #666666; font-size: 16px; line-height: 1.5;">{}</p>
                        </td>
                    </tr>
                    <tr>
                        <td style="background-color: #f8f9fa; padding: 16px 30px; text-align: center; border-top: 1px solid #e9ecef;">
                            <p style="margin: 0; color: #999999; font-size: 12px;">
                                This is an automated message from {}. Please do not reply.
                            </p>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"#,
            title, self.config.from_name, title, details, self.config.from_name
        )
    }
}
