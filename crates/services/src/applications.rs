//! # Application Lifecycle Manager
//!
//! Owns the `pending -> approved | declined` lifecycle.
//!
//! A status change runs strictly in this order:
//! 1. resolve the current context (`NotFound` if absent) and apply the
//!    owner-or-admin rule with the pet's owner as owner;
//! 2. write the new status (no check against the previous one);
//! 3. read the context back;
//! 4. on approval, cascade `Adopted` onto the pet (soft);
//! 5. dispatch the applicant notification (soft, on its own task).
//!
//! Steps 2 and 4 are independent commits. Nothing is held between the
//! write and the read-back, so concurrent updates are last-write-wins.

use std::sync::Arc;

use domains::{
    ensure_admin, ensure_owner_or_admin, ApplicationAnswers, ApplicationId,
    ApplicationRepository, ApplicationStatus, ApplicationSummary, DomainError, NewApplication,
    Page, PageRequest, PetId, Principal, UserId,
};
use tracing::{info, instrument, warn};

use crate::notification::{compose_status_message, NotificationDispatcher, NotificationHandle};
use crate::pets::PetStatusSynchronizer;
use crate::side_effect::SideEffect;

/// Submission input; the applicant is taken from the principal.
#[derive(Debug, Clone, Default)]
pub struct SubmitApplication {
    pub pet_id: Option<PetId>,
    pub answers: ApplicationAnswers,
}

/// Result of a successful status change.
///
/// The status write and read-back succeeded; `cascade` and
/// `notification` describe the secondary effects, which callers may log
/// or count but must not turn into failures.
#[derive(Debug)]
pub struct StatusChange {
    pub application_id: ApplicationId,
    pub status: ApplicationStatus,
    pub cascade: SideEffect,
    pub notification: NotificationHandle,
}

#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepository>,
    pet_status: PetStatusSynchronizer,
    notifier: NotificationDispatcher,
}

impl ApplicationService {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        pet_status: PetStatusSynchronizer,
        notifier: NotificationDispatcher,
    ) -> Self {
        Self {
            applications,
            pet_status,
            notifier,
        }
    }

    /// Creates a `pending` application for `principal`.
    #[instrument(skip_all, fields(applicant = %principal.user_id))]
    pub async fn submit(
        &self,
        principal: &Principal,
        input: SubmitApplication,
    ) -> Result<ApplicationId, DomainError> {
        let pet_id = input
            .pet_id
            .ok_or_else(|| DomainError::Validation("petId is required".into()))?;

        let id = self
            .applications
            .create(NewApplication {
                applicant_id: principal.user_id,
                pet_id,
                answers: input.answers,
            })
            .await?;

        info!(application_id = %id, pet_id = %pet_id, "application submitted");
        Ok(id)
    }

    /// Writes `status` and runs the cascade and notification.
    #[instrument(skip_all, fields(application_id = %id, status = %status))]
    pub async fn update_status(
        &self,
        principal: &Principal,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<StatusChange, DomainError> {
        let current = self
            .applications
            .context(id)
            .await?
            .ok_or_else(|| DomainError::not_found("application", id))?;
        ensure_owner_or_admin(current.pet_owner_id, principal, "application")?;

        self.applications.set_status(id, status).await?;

        // A concurrent delete can land between the write and this read.
        // The write is not rolled back.
        let context = self.applications.context(id).await?.ok_or_else(|| {
            DomainError::Internal(format!(
                "application {id} disappeared after its status was written"
            ))
        })?;

        let cascade = if status == ApplicationStatus::Approved {
            self.pet_status.mark_adopted(context.pet_id).await
        } else {
            SideEffect::Skipped
        };
        if cascade.is_failed() {
            warn!(pet_id = %context.pet_id, "status kept despite failed pet cascade");
        }

        let notification = self
            .notifier
            .dispatch(compose_status_message(&context, status));

        info!(previous = %current.status, %cascade, "application status updated");
        Ok(StatusChange {
            application_id: id,
            status,
            cascade,
            notification,
        })
    }

    /// Administrative removal. Unconditional on status; the pet's
    /// availability is left as it is.
    #[instrument(skip_all, fields(application_id = %id))]
    pub async fn delete(&self, principal: &Principal, id: ApplicationId) -> Result<(), DomainError> {
        ensure_admin(principal, "delete applications")?;

        if !self.applications.delete(id).await? {
            return Err(DomainError::not_found("application", id));
        }
        info!("application deleted");
        Ok(())
    }

    /// Applications for the pets `principal` has listed.
    pub async fn for_my_pets(
        &self,
        principal: &Principal,
    ) -> Result<Vec<ApplicationSummary>, DomainError> {
        self.for_owner(principal.user_id).await
    }

    /// Applications for the pets of `owner`; an empty result is `NotFound`.
    pub async fn for_owner(&self, owner: UserId) -> Result<Vec<ApplicationSummary>, DomainError> {
        let applications = self.applications.list_for_owner(owner).await?;
        if applications.is_empty() {
            return Err(DomainError::NotFound(
                "applications for owner",
                owner.to_string(),
            ));
        }
        Ok(applications)
    }

    /// Admin-wide listing, newest first.
    pub async fn list_all(
        &self,
        principal: &Principal,
        request: PageRequest,
    ) -> Result<Page<ApplicationSummary>, DomainError> {
        ensure_admin(principal, "list all applications")?;
        self.applications.list_all(request).await
    }
}
