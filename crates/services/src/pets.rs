use std::sync::Arc;

use domains::{
    ensure_admin, DomainError, NewPet, PetDetails, PetId, PetRepository, PhotoList, Principal,
    AVAILABILITY_ADOPTED,
};
use tracing::{error, info, instrument};

use crate::notification::{compose_pet_review_message, NotificationDispatcher, NotificationHandle};
use crate::side_effect::SideEffect;

/// Upper bound on each file list of a listing (photos, certificates).
pub const MAX_PET_FILES: usize = 4;

/// Writes a pet's availability projection in reaction to an approval.
///
/// The write is a soft dependency of the status change: its failure is
/// logged and returned as `SideEffect::Failed`, never as an error.
#[derive(Clone)]
pub struct PetStatusSynchronizer {
    pets: Arc<dyn PetRepository>,
}

impl PetStatusSynchronizer {
    pub fn new(pets: Arc<dyn PetRepository>) -> Self {
        Self { pets }
    }

    /// Sets `availability` unconditionally; idempotent by construction.
    #[instrument(skip_all, fields(pet_id = %pet_id))]
    pub async fn sync(&self, pet_id: PetId, availability: &str) -> SideEffect {
        match self.pets.set_availability(pet_id, availability).await {
            Ok(()) => {
                info!(availability, "pet availability updated");
                SideEffect::Applied
            }
            Err(e) => {
                error!(error = %e, availability, "failed to update pet availability");
                SideEffect::Failed(e.to_string())
            }
        }
    }

    pub async fn mark_adopted(&self, pet_id: PetId) -> SideEffect {
        self.sync(pet_id, AVAILABILITY_ADOPTED).await
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreatePet {
    pub name: String,
    pub pet_type: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub description: Option<String>,
    pub photos: Vec<String>,
    pub vaccination_certificates: Vec<String>,
}

/// Checks a listing before any of its files are stored.
pub fn check_pet_fields(name: &str, photos: usize, certificates: usize) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation("pet name is required".into()));
    }
    if certificates == 0 {
        return Err(DomainError::Validation(
            "Vaccination Certificate is required.".into(),
        ));
    }
    if photos > MAX_PET_FILES || certificates > MAX_PET_FILES {
        return Err(DomainError::Validation(format!(
            "at most {MAX_PET_FILES} photos and {MAX_PET_FILES} certificates per pet"
        )));
    }
    Ok(())
}

/// Pet listings: creation by members, review by admins, detail reads.
#[derive(Clone)]
pub struct PetService {
    pets: Arc<dyn PetRepository>,
    notifier: NotificationDispatcher,
}

impl PetService {
    pub fn new(pets: Arc<dyn PetRepository>, notifier: NotificationDispatcher) -> Self {
        Self { pets, notifier }
    }

    /// Lists a pet owned by `principal`. New listings await admin approval.
    #[instrument(skip_all, fields(owner = %principal.user_id))]
    pub async fn create(&self, principal: &Principal, input: CreatePet) -> Result<PetId, DomainError> {
        check_pet_fields(
            &input.name,
            input.photos.len(),
            input.vaccination_certificates.len(),
        )?;

        let id = self
            .pets
            .create(NewPet {
                owner_id: principal.user_id,
                name: input.name.trim().to_owned(),
                pet_type: input.pet_type,
                species: input.species,
                breed: input.breed,
                description: input.description,
                photos: PhotoList::new(input.photos),
                vaccination_certificates: PhotoList::new(input.vaccination_certificates),
            })
            .await?;
        info!(pet_id = %id, "pet added");
        Ok(id)
    }

    /// Admin review of a listing. The owner is told on a detached task.
    #[instrument(skip_all, fields(pet_id = %pet_id, approved))]
    pub async fn review(
        &self,
        principal: &Principal,
        pet_id: PetId,
        approved: bool,
    ) -> Result<NotificationHandle, DomainError> {
        ensure_admin(principal, "review pets")?;
        let details = self.details(pet_id).await?;

        if !self.pets.set_approval(pet_id, approved).await? {
            return Err(DomainError::not_found("pet", pet_id));
        }
        info!("pet reviewed");
        Ok(self
            .notifier
            .dispatch(compose_pet_review_message(&details, approved)))
    }

    pub async fn details(&self, pet_id: PetId) -> Result<PetDetails, DomainError> {
        self.pets
            .find_details(pet_id)
            .await?
            .ok_or_else(|| DomainError::not_found("pet", pet_id))
    }
}
