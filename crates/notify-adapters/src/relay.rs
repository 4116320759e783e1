use std::time::Duration;

use async_trait::async_trait;
use domains::{DomainError, Mailer, OutboundMessage};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;

/// JSON body accepted by the HTTP mail relay.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RelayPayload<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub subject: &'a str,
    pub text: &'a str,
}

impl<'a> RelayPayload<'a> {
    pub fn new(from: &'a str, message: &'a OutboundMessage) -> Self {
        Self {
            from,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        }
    }
}

/// Delivers mail by POSTing it to an HTTP relay.
pub struct RelayMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<SecretString>,
    from: String,
}

impl RelayMailer {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<SecretString>,
        from: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Internal(format!("failed to build mail client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            from: from.into(),
        })
    }
}

#[async_trait]
impl Mailer for RelayMailer {
    async fn send(&self, message: OutboundMessage) -> Result<(), DomainError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&RelayPayload::new(&self.from, &message));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::SoftDependency(format!("mail relay unreachable: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::SoftDependency(format!(
                "mail relay answered {status}"
            )));
        }
        debug!(to = %message.to, %status, "mail accepted by relay");
        Ok(())
    }
}
