//! Transactional email notifier
//!
//! Fire-and-forget: notifications are spawned off the request task and a
//! delivery failure never fails the surrounding request. With no API key
//! configured, sends are skipped and logged.

use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};
use voluntree_core::{ApplicationStatus, VoluntreeError, VoluntreeResult};

const DEFAULT_ENDPOINT: &str = "https://api.resend.com/emails";

/// Resend-compatible mail client
pub struct Mailer {
    client: Client,
    api_key: Option<String>,
    from: String,
    endpoint: String,
}

impl Mailer {
    pub fn new(api_key: Option<String>, from: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            from,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Send one email. Skips silently (with a log line) when the provider is
    /// not configured.
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> VoluntreeResult<()> {
        let Some(api_key) = &self.api_key else {
            debug!("Email provider not configured, skipping send to {}", to);
            return Ok(());
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&json!({
                "from": self.from,
                "to": to,
                "subject": subject,
                "html": html,
            }))
            .send()
            .await
            .map_err(|e| VoluntreeError::Email(e.to_string()))?;

        response
            .error_for_status()
            .map_err(|e| VoluntreeError::Email(e.to_string()))?;

        debug!("Email sent to {}: {}", to, subject);
        Ok(())
    }

    /// Spawn a send off the request task. Failures are logged, never
    /// propagated.
    pub fn send_in_background(self: &Arc<Self>, to: String, subject: String, html: String) {
        let mailer = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = mailer.send(&to, &subject, &html).await {
                warn!("Failed to send email to {}: {}", to, e);
            }
        });
    }
}

/// Confirmation sent to the applicant right after submitting.
pub fn application_received_email(
    applicant_name: &str,
    opportunity_title: &str,
    organization_name: &str,
) -> (String, String) {
    let subject = format!("Application Received: {}", opportunity_title);
    let html = format!(
        "<p>Dear {},</p>\
         <p>Your application for <strong>{}</strong> at {} has been received. \
         The host organization will review it and get back to you.</p>\
         <p>— The Voluntree team</p>",
        applicant_name, opportunity_title, organization_name
    );
    (subject, html)
}

/// Update sent to the applicant when an organization changes the status.
pub fn application_status_email(
    applicant_name: &str,
    opportunity_title: &str,
    status: ApplicationStatus,
) -> (String, String) {
    let subject = format!("Application Update: {}", opportunity_title);
    let html = format!(
        "<p>Dear {},</p>\
         <p>Your application for <strong>{}</strong> is now <strong>{}</strong>.</p>\
         <p>— The Voluntree team</p>",
        applicant_name, opportunity_title, status
    );
    (subject, html)
}
