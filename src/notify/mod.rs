pub mod message;
pub mod telegram;

use async_trait::async_trait;

use crate::submission::Submission;

/// How a failed or impossible delivery affects the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryPolicy {
    /// Missing configuration or a failed send fails the request.
    Mandatory,
    /// Failures are logged and reported as "not sent".
    BestEffort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    NotSent,
}

impl Delivery {
    pub fn sent(self) -> bool {
        self == Delivery::Sent
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("bot token or chat id not configured")]
    NotConfigured,

    /// The messaging API answered with a non-success status.
    #[error("API returned {status}: {}", .description.as_deref().unwrap_or("no description"))]
    Api {
        status: u16,
        description: Option<String>,
    },

    /// No response was received.
    #[error("no response from API: {0}")]
    Unreachable(String),
}

/// Outbound text channel for submission notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Whether credentials are present. Unconfigured notifiers are never called.
    fn is_configured(&self) -> bool;

    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Format and send a submission under `policy`.
///
/// `Mandatory` surfaces every failure; `BestEffort` only ever returns
/// `Ok`, with `Delivery::NotSent` standing in for the failure.
pub async fn deliver(
    notifier: &dyn Notifier,
    submission: &Submission,
    policy: DeliveryPolicy,
) -> Result<Delivery, NotifyError> {
    if !notifier.is_configured() {
        return match policy {
            DeliveryPolicy::Mandatory => Err(NotifyError::NotConfigured),
            DeliveryPolicy::BestEffort => {
                tracing::debug!(id = %submission.id, "Telegram not configured, skipping notification");
                Ok(Delivery::NotSent)
            }
        };
    }

    let text = message::render(submission);
    match notifier.send(&text).await {
        Ok(()) => {
            tracing::info!(id = %submission.id, "Notification sent");
            Ok(Delivery::Sent)
        }
        Err(e) => match policy {
            DeliveryPolicy::Mandatory => Err(e),
            DeliveryPolicy::BestEffort => {
                tracing::warn!(id = %submission.id, "Notification failed: {e}");
                Ok(Delivery::NotSent)
            }
        },
    }
}
