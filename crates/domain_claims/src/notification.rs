//! Notification outcomes and message content

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::claim::ClaimRecord;

/// Outcome of one notification channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum ChannelOutcome {
    Sent,
    Skipped(String),
    Failed(String),
}

impl ChannelOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, ChannelOutcome::Sent)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ChannelOutcome::Failed(_))
    }
}

/// Per-channel outcomes of one notification attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationReport {
    channels: BTreeMap<String, ChannelOutcome>,
}

impl NotificationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report marking every channel failed with the same reason
    pub fn all_failed<I, S>(channels: I, reason: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut report = Self::new();
        for channel in channels {
            report.record(channel, ChannelOutcome::Failed(reason.to_string()));
        }
        report
    }

    pub fn record(&mut self, channel: impl Into<String>, outcome: ChannelOutcome) {
        self.channels.insert(channel.into(), outcome);
    }

    /// Merges another report, later entries winning
    pub fn merge(&mut self, other: NotificationReport) {
        self.channels.extend(other.channels);
    }

    pub fn get(&self, channel: &str) -> Option<&ChannelOutcome> {
        self.channels.get(channel)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChannelOutcome)> {
        self.channels.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn sent_count(&self) -> usize {
        self.channels.values().filter(|o| o.is_sent()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.channels.values().any(ChannelOutcome::is_failed)
    }
}

/// Channel-independent notification content for a claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub subject: String,
    pub claim_id: String,
    pub policy_id: String,
    pub status: String,
    pub damage_type: String,
    pub payout: String,
}

impl NotificationMessage {
    pub fn for_claim(claim: &ClaimRecord) -> Self {
        Self {
            subject: format!("Claim {} processed: {}", claim.claim_id, claim.payout.status.title()),
            claim_id: claim.claim_id.to_string(),
            policy_id: claim.policy.policy_id.clone(),
            status: claim.payout.status.title().to_string(),
            damage_type: claim.damage.damage_type.clone(),
            payout: claim.payout.payout_amount.to_display_string(),
        }
    }

    /// Plain-text body
    pub fn body(&self) -> String {
        format!(
            "Claim {} for policy {}\nDamage: {}\nStatus: {}\nPayout: {}",
            self.claim_id, self.policy_id, self.damage_type, self.status, self.payout
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes_as_map() {
        let mut report = NotificationReport::new();
        report.record("slack", ChannelOutcome::Skipped("no webhook configured".into()));
        report.record("email", ChannelOutcome::Sent);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["email"]["outcome"], "sent");
        assert_eq!(json["slack"]["outcome"], "skipped");
        assert_eq!(json["slack"]["reason"], "no webhook configured");
    }

    #[test]
    fn test_all_failed() {
        let report = NotificationReport::all_failed(["slack", "email"], "timed out");
        assert_eq!(report.len(), 2);
        assert!(report.has_failures());
        assert_eq!(report.sent_count(), 0);
    }
}
