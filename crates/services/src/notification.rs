//! # Notification Dispatcher
//!
//! Builds the applicant-facing message for a status change and hands it
//! to the mail transport on a separate task. Delivery never blocks or
//! alters the response of the request that triggered it.

use std::sync::Arc;

use domains::{ApplicationContext, ApplicationStatus, Mailer, OutboundMessage, PetDetails};
use tokio::task::JoinHandle;
use tracing::{error, info, Instrument};

use crate::side_effect::SideEffect;

/// Builds the message sent to the applicant after a status change.
///
/// Declined applications get a rejection notice without any owner
/// details; every other status shares the owner's email, contact number
/// and address so the applicant can follow up.
pub fn compose_status_message(
    context: &ApplicationContext,
    status: ApplicationStatus,
) -> OutboundMessage {
    let pet = &context.pet_name;
    let mut body = format!("Hello {},\n\n", context.applicant_name);

    let subject = match status {
        ApplicationStatus::Declined => {
            body.push_str(&format!(
                "We're sorry to inform you that your application for {pet} has been rejected \
                 because your application doesn't meet the required requirements.\n\n\
                 Thank you for your interest."
            ));
            format!("Your application for {pet} has been rejected")
        }
        _ => {
            body.push_str(&format!(
                "Your application for {pet} has been {status}.\n\n\
                 You can now contact the pet owner at:\n\
                 Email: {}\n\
                 Contact Number: {}\n\
                 Address: {}\n\n\
                 Thank you for using our services!",
                context.owner_email,
                context.owner_contact_number.as_deref().unwrap_or("not provided"),
                context.owner_address.as_deref().unwrap_or("not provided"),
            ));
            format!("Your application status for {pet} has been updated")
        }
    };

    OutboundMessage {
        to: context.applicant_email.clone(),
        subject,
        body,
    }
}

/// Tells a pet's owner that an admin approved or declined the listing.
pub fn compose_pet_review_message(details: &PetDetails, approved: bool) -> OutboundMessage {
    let pet = &details.pet;
    let (subject, body) = if approved {
        (
            "Pet Approval Notification",
            format!(
                "Congratulations! Your pet, {}, with ID {} has been approved successfully.",
                pet.name, pet.id
            ),
        )
    } else {
        (
            "Pet Application Declined",
            format!(
                "We regret to inform you that your pet, {}, with ID {} has been declined.",
                pet.name, pet.id
            ),
        )
    };
    OutboundMessage {
        to: details.owner_email.clone(),
        subject: subject.to_owned(),
        body,
    }
}

/// Handle to an in-flight delivery. Dropping it detaches the task.
#[derive(Debug)]
pub struct NotificationHandle(JoinHandle<SideEffect>);

impl NotificationHandle {
    /// Waits for delivery to finish. A panicked task reads as a failure.
    pub async fn outcome(self) -> SideEffect {
        match self.0.await {
            Ok(outcome) => outcome,
            Err(join_error) => SideEffect::Failed(join_error.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    mailer: Arc<dyn Mailer>,
}

impl NotificationDispatcher {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    /// Spawns delivery of `message`; must be called inside a Tokio runtime.
    pub fn dispatch(&self, message: OutboundMessage) -> NotificationHandle {
        let mailer = Arc::clone(&self.mailer);
        let span = tracing::info_span!("notify", to = %message.to);

        let task = tokio::spawn(
            async move {
                let subject = message.subject.clone();
                match mailer.send(message).await {
                    Ok(()) => {
                        info!(%subject, "notification delivered");
                        SideEffect::Applied
                    }
                    Err(e) => {
                        error!(error = %e, %subject, "notification delivery failed");
                        SideEffect::Failed(e.to_string())
                    }
                }
            }
            .instrument(span),
        );

        NotificationHandle(task)
    }
}
