use async_trait::async_trait;
use domains::{DomainError, Mailer, OutboundMessage};
use tracing::info;

/// Writes messages to the log instead of delivering them.
///
/// The default transport for development and for deployments without a relay.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: OutboundMessage) -> Result<(), DomainError> {
        info!(
            from = %self.from,
            to = %message.to,
            subject = %message.subject,
            body_len = message.body.len(),
            "mail delivered to log"
        );
        Ok(())
    }
}
