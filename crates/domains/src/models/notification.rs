use serde::{Deserialize, Serialize};

/// A message handed to the mail transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}
