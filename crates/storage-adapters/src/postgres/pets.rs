use async_trait::async_trait;
use domains::{
    DomainError, NewPet, Pet, PetDetails, PetId, PetRepository, UserId, AVAILABILITY_AVAILABLE,
};
use sqlx::postgres::PgRow;
use sqlx::Row;

use super::{decode_photos, storage, PgStore};

fn details_from_row(row: &PgRow) -> Result<PetDetails, sqlx::Error> {
    let id: i64 = row.try_get("pet_id")?;
    Ok(PetDetails {
        pet: Pet {
            id: PetId(id),
            owner_id: UserId(row.try_get("owner_id")?),
            name: row.try_get("pet_name")?,
            pet_type: row.try_get("pet_type")?,
            species: row.try_get("species")?,
            breed: row.try_get("breed")?,
            description: row.try_get("description")?,
            is_approved: row.try_get("is_approved")?,
            availability: row.try_get("status")?,
            photos: decode_photos(row.try_get("pet_photo")?, "pet", id),
            vaccination_certificates: decode_photos(
                row.try_get("vaccination_certificate")?,
                "pet",
                id,
            ),
            date_added: row.try_get("date_added")?,
        },
        owner_full_name: row.try_get("owner_full_name")?,
        owner_email: row.try_get("owner_email")?,
        new_owner_full_name: row.try_get("new_owner_full_name")?,
    })
}

#[async_trait]
impl PetRepository for PgStore {
    async fn create(&self, pet: NewPet) -> Result<PetId, DomainError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO pets
                 (owner_id, pet_name, pet_type, species, breed, description, is_approved,
                  status, pet_photo, vaccination_certificate)
             VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7, $8, $9)
             RETURNING pet_id",
        )
        .bind(pet.owner_id.0)
        .bind(pet.name)
        .bind(pet.pet_type)
        .bind(pet.species)
        .bind(pet.breed)
        .bind(pet.description)
        .bind(AVAILABILITY_AVAILABLE)
        .bind(pet.photos.to_json())
        .bind(pet.vaccination_certificates.to_json())
        .fetch_one(self.pool())
        .await
        .map_err(storage)?;
        Ok(PetId(id))
    }

    /// The most recent approved applicant, if any, is reported as new owner.
    async fn find_details(&self, id: PetId) -> Result<Option<PetDetails>, DomainError> {
        let row = sqlx::query(
            "SELECT p.pet_id, p.owner_id, p.pet_name, p.pet_type, p.species, p.breed,
                    p.description, p.is_approved, p.status, p.pet_photo,
                    p.vaccination_certificate, p.date_added,
                    owner.full_name AS owner_full_name, owner.email AS owner_email,
                    new_owner.full_name AS new_owner_full_name
             FROM pets p
             JOIN users owner ON p.owner_id = owner.user_id
             LEFT JOIN applications a ON a.pet_id = p.pet_id AND a.status = 'approved'
             LEFT JOIN users new_owner ON a.user_id = new_owner.user_id
             WHERE p.pet_id = $1
             ORDER BY a.date_submitted DESC NULLS LAST, a.application_id DESC NULLS LAST
             LIMIT 1",
        )
        .bind(id.0)
        .fetch_optional(self.pool())
        .await
        .map_err(storage)?;

        row.as_ref()
            .map(details_from_row)
            .transpose()
            .map_err(storage)
    }

    async fn set_availability(&self, id: PetId, availability: &str) -> Result<(), DomainError> {
        sqlx::query("UPDATE pets SET status = $1 WHERE pet_id = $2")
            .bind(availability)
            .bind(id.0)
            .execute(self.pool())
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn set_approval(&self, id: PetId, approved: bool) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE pets SET is_approved = $1 WHERE pet_id = $2")
            .bind(approved)
            .bind(id.0)
            .execute(self.pool())
            .await
            .map_err(storage)?;
        Ok(result.rows_affected() > 0)
    }
}
