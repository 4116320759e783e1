use async_trait::async_trait;
use domains::{
    Application, ApplicationAnswers, ApplicationContext, ApplicationId, ApplicationRepository,
    ApplicationStatus, ApplicationSummary, DomainError, NewApplication, Page, PageRequest, PetId,
    UserId,
};
use sqlx::postgres::PgRow;
use sqlx::Row;

use super::{decode_photos, storage, PgStore};

const SUMMARY_SELECT: &str = "
    SELECT a.application_id, a.user_id, a.pet_id, a.pet_experience, a.home_environment,
           a.other_pets, a.children_at_home, a.reason_for_adoption, a.status, a.date_submitted,
           p.pet_name, p.pet_photo,
           u.full_name AS applicant_name, u.email AS applicant_email,
           u.address AS applicant_address, u.contact_number AS applicant_contact_number,
           u.profile_photo AS applicant_profile_photo
    FROM applications a
    JOIN pets p ON a.pet_id = p.pet_id
    JOIN users u ON a.user_id = u.user_id";

const SEARCH_FILTER: &str = "WHERE ($1::text IS NULL
        OR p.pet_name ILIKE $1 ESCAPE '\\'
        OR u.full_name ILIKE $1 ESCAPE '\\')";

/// Substring pattern for `ILIKE ... ESCAPE '\'`; the search text matches
/// literally, wildcards included.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn status_from_row(row: &PgRow) -> Result<ApplicationStatus, sqlx::Error> {
    row.try_get::<String, _>("status")?
        .parse()
        .map_err(|e: DomainError| sqlx::Error::Decode(Box::new(e)))
}

fn application_from_row(row: &PgRow) -> Result<Application, sqlx::Error> {
    Ok(Application {
        id: ApplicationId(row.try_get("application_id")?),
        applicant_id: UserId(row.try_get("user_id")?),
        pet_id: PetId(row.try_get("pet_id")?),
        answers: ApplicationAnswers {
            pet_experience: row.try_get("pet_experience")?,
            home_environment: row.try_get("home_environment")?,
            other_pets: row.try_get("other_pets")?,
            children_at_home: row.try_get("children_at_home")?,
            reason_for_adoption: row.try_get("reason_for_adoption")?,
        },
        status: status_from_row(row)?,
        date_submitted: row.try_get("date_submitted")?,
    })
}

fn summary_from_row(row: &PgRow) -> Result<ApplicationSummary, sqlx::Error> {
    let application = application_from_row(row)?;
    let pet_photos = decode_photos(row.try_get("pet_photo")?, "pet", application.pet_id.0);
    Ok(ApplicationSummary {
        application,
        pet_name: row.try_get("pet_name")?,
        pet_photos,
        applicant_name: row.try_get("applicant_name")?,
        applicant_email: row.try_get("applicant_email")?,
        applicant_address: row.try_get("applicant_address")?,
        applicant_contact_number: row.try_get("applicant_contact_number")?,
        applicant_profile_photo: row.try_get("applicant_profile_photo")?,
    })
}

fn context_from_row(row: &PgRow) -> Result<ApplicationContext, sqlx::Error> {
    Ok(ApplicationContext {
        application_id: ApplicationId(row.try_get("application_id")?),
        status: status_from_row(row)?,
        pet_id: PetId(row.try_get("pet_id")?),
        pet_name: row.try_get("pet_name")?,
        pet_owner_id: UserId(row.try_get("owner_id")?),
        applicant_id: UserId(row.try_get("applicant_id")?),
        applicant_name: row.try_get("applicant_name")?,
        applicant_email: row.try_get("applicant_email")?,
        owner_email: row.try_get("owner_email")?,
        owner_contact_number: row.try_get("owner_contact_number")?,
        owner_address: row.try_get("owner_address")?,
    })
}

#[async_trait]
impl ApplicationRepository for PgStore {
    async fn create(&self, application: NewApplication) -> Result<ApplicationId, DomainError> {
        let answers = application.answers;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO applications
                 (user_id, pet_id, pet_experience, home_environment, other_pets,
                  children_at_home, reason_for_adoption, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING application_id",
        )
        .bind(application.applicant_id.0)
        .bind(application.pet_id.0)
        .bind(answers.pet_experience)
        .bind(answers.home_environment)
        .bind(answers.other_pets)
        .bind(answers.children_at_home)
        .bind(answers.reason_for_adoption)
        .bind(ApplicationStatus::Pending.as_str())
        .fetch_one(self.pool())
        .await
        .map_err(storage)?;
        Ok(ApplicationId(id))
    }

    async fn find(&self, id: ApplicationId) -> Result<Option<Application>, DomainError> {
        let row = sqlx::query(
            "SELECT application_id, user_id, pet_id, pet_experience, home_environment,
                    other_pets, children_at_home, reason_for_adoption, status, date_submitted
             FROM applications WHERE application_id = $1",
        )
        .bind(id.0)
        .fetch_optional(self.pool())
        .await
        .map_err(storage)?;

        row.as_ref()
            .map(application_from_row)
            .transpose()
            .map_err(storage)
    }

    async fn set_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), DomainError> {
        sqlx::query("UPDATE applications SET status = $1 WHERE application_id = $2")
            .bind(status.as_str())
            .bind(id.0)
            .execute(self.pool())
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn context(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ApplicationContext>, DomainError> {
        let row = sqlx::query(
            "SELECT a.application_id, a.status,
                    p.pet_id, p.pet_name, p.owner_id,
                    u.user_id AS applicant_id, u.full_name AS applicant_name,
                    u.email AS applicant_email,
                    owner.email AS owner_email, owner.contact_number AS owner_contact_number,
                    owner.address AS owner_address
             FROM applications a
             JOIN users u ON a.user_id = u.user_id
             JOIN pets p ON a.pet_id = p.pet_id
             JOIN users owner ON p.owner_id = owner.user_id
             WHERE a.application_id = $1",
        )
        .bind(id.0)
        .fetch_optional(self.pool())
        .await
        .map_err(storage)?;

        row.as_ref()
            .map(context_from_row)
            .transpose()
            .map_err(storage)
    }

    async fn delete(&self, id: ApplicationId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM applications WHERE application_id = $1")
            .bind(id.0)
            .execute(self.pool())
            .await
            .map_err(storage)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_for_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<ApplicationSummary>, DomainError> {
        let sql = format!(
            "{SUMMARY_SELECT}
             WHERE p.owner_id = $1
             ORDER BY a.date_submitted DESC, a.application_id DESC"
        );
        sqlx::query(&sql)
            .bind(owner.0)
            .fetch_all(self.pool())
            .await
            .map_err(storage)?
            .iter()
            .map(summary_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage)
    }

    async fn list_all(
        &self,
        request: PageRequest,
    ) -> Result<Page<ApplicationSummary>, DomainError> {
        let pattern = request.search.as_deref().map(like_pattern);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*)
             FROM applications a
             JOIN pets p ON a.pet_id = p.pet_id
             JOIN users u ON a.user_id = u.user_id
             {SEARCH_FILTER}"
        ))
        .bind(pattern.as_deref())
        .fetch_one(self.pool())
        .await
        .map_err(storage)?;

        let sql = format!(
            "{SUMMARY_SELECT}
             {SEARCH_FILTER}
             ORDER BY a.date_submitted DESC, a.application_id DESC
             LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query(&sql)
            .bind(pattern.as_deref())
            .bind(request.limit() as i64)
            .bind(request.offset() as i64)
            .fetch_all(self.pool())
            .await
            .map_err(storage)?
            .iter()
            .map(summary_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage)?;

        Ok(Page {
            items,
            total_count: total.max(0) as u64,
        })
    }
}
