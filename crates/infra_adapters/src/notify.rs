//! Notification adapters
//!
//! Each notifier reports exactly one channel. `CompositeNotifier` fans a
//! claim out to several and merges their reports.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use core_kernel::{DomainPort, PortError};
use domain_claims::{ChannelOutcome, ClaimRecord, NotificationMessage, NotificationReport, Notifier};

/// Default recipient when a claim was submitted without an email
pub const DEFAULT_RECIPIENT: &str = "customer@example.com";

/// Posts a Block Kit summary to a Slack incoming webhook
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl SlackNotifier {
    pub const CHANNEL: &'static str = "slack";

    /// Creates a notifier; `None` or a blank URL disables the channel
    ///
    /// # Errors
    ///
    /// Returns `PortError::Internal` when the HTTP client cannot be built.
    pub fn new(webhook_url: Option<String>, timeout: Duration) -> Result<Self, PortError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortError::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            webhook_url: webhook_url.filter(|url| !url.trim().is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Slack Block Kit payload for a claim
    pub fn payload(message: &NotificationMessage) -> Value {
        json!({
            "text": message.subject,
            "blocks": [
                {
                    "type": "header",
                    "text": { "type": "plain_text", "text": "New Claim Processed" }
                },
                {
                    "type": "section",
                    "fields": [
                        { "type": "mrkdwn", "text": format!("*Policy ID:*\n{}", message.policy_id) },
                        { "type": "mrkdwn", "text": format!("*Status:*\n{}", message.status) },
                        { "type": "mrkdwn", "text": format!("*Damage Type:*\n{}", message.damage_type) },
                        { "type": "mrkdwn", "text": format!("*Payout:*\n{}", message.payout) }
                    ]
                },
                {
                    "type": "context",
                    "elements": [
                        { "type": "mrkdwn", "text": format!("Claim {}", message.claim_id) }
                    ]
                }
            ]
        })
    }

    async fn post(&self, url: &str, payload: &Value) -> ChannelOutcome {
        match self.client.post(url).json(payload).send().await {
            Ok(response) if response.status().is_success() => ChannelOutcome::Sent,
            Ok(response) => ChannelOutcome::Failed(format!("webhook returned {}", response.status())),
            Err(e) if e.is_timeout() => ChannelOutcome::Failed("webhook request timed out".to_string()),
            Err(e) => ChannelOutcome::Failed(format!("webhook request failed: {}", e)),
        }
    }
}

impl DomainPort for SlackNotifier {}

#[async_trait]
impl Notifier for SlackNotifier {
    fn channels(&self) -> Vec<String> {
        vec![Self::CHANNEL.to_string()]
    }

    async fn notify(&self, claim: &ClaimRecord, _contact: Option<&str>) -> NotificationReport {
        let mut report = NotificationReport::new();

        let Some(url) = self.webhook_url.as_deref() else {
            report.record(Self::CHANNEL, ChannelOutcome::Skipped("no webhook configured".to_string()));
            return report;
        };

        let payload = Self::payload(&NotificationMessage::for_claim(claim));
        let outcome = self.post(url, &payload).await;
        match &outcome {
            ChannelOutcome::Sent => info!(claim_id = %claim.claim_id, "Slack notification sent"),
            other => warn!(claim_id = %claim.claim_id, outcome = ?other, "Slack notification not sent"),
        }

        report.record(Self::CHANNEL, outcome);
        report
    }
}

/// Email stub: logs the message and reports it as sent
#[derive(Debug, Clone)]
pub struct EmailNotifier {
    default_recipient: String,
}

impl EmailNotifier {
    pub const CHANNEL: &'static str = "email";

    pub fn new() -> Self {
        Self::with_default_recipient(DEFAULT_RECIPIENT)
    }

    pub fn with_default_recipient(recipient: impl Into<String>) -> Self {
        Self {
            default_recipient: recipient.into(),
        }
    }

    pub fn default_recipient(&self) -> &str {
        &self.default_recipient
    }
}

impl Default for EmailNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainPort for EmailNotifier {}

#[async_trait]
impl Notifier for EmailNotifier {
    fn channels(&self) -> Vec<String> {
        vec![Self::CHANNEL.to_string()]
    }

    async fn notify(&self, claim: &ClaimRecord, contact: Option<&str>) -> NotificationReport {
        let message = NotificationMessage::for_claim(claim);
        let recipient = contact.unwrap_or(&self.default_recipient);

        info!(
            to = %recipient,
            subject = %message.subject,
            payout = %message.payout,
            status = %message.status,
            "Email notification"
        );

        let mut report = NotificationReport::new();
        report.record(Self::CHANNEL, ChannelOutcome::Sent);
        report
    }
}

/// Runs several notifiers in turn and merges their reports
#[derive(Clone, Default)]
pub struct CompositeNotifier {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl CompositeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl DomainPort for CompositeNotifier {}

#[async_trait]
impl Notifier for CompositeNotifier {
    fn channels(&self) -> Vec<String> {
        self.notifiers.iter().flat_map(|n| n.channels()).collect()
    }

    async fn notify(&self, claim: &ClaimRecord, contact: Option<&str>) -> NotificationReport {
        let mut report = NotificationReport::new();
        for notifier in &self.notifiers {
            report.merge(notifier.notify(claim, contact).await);
        }
        report
    }
}
