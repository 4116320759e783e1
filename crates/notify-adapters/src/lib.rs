//! # notify-adapters
//!
//! Outbound mail transports behind the `Mailer` port.

mod log_mailer;

#[cfg(feature = "mail-relay")]
mod relay;

pub use log_mailer::LogMailer;

#[cfg(feature = "mail-relay")]
pub use relay::{RelayMailer, RelayPayload};
