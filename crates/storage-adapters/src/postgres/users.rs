use async_trait::async_trait;
use domains::{Account, DomainError, NewUser, Role, User, UserId, UserRepository};
use sqlx::postgres::PgRow;
use sqlx::Row;

use super::{storage, PgStore};

fn account_from_row(row: &PgRow) -> Result<Account, sqlx::Error> {
    let user_type: String = row.try_get("user_type")?;
    Ok(Account {
        user: User {
            id: UserId(row.try_get("user_id")?),
            full_name: row.try_get("full_name")?,
            email: row.try_get("email")?,
            contact_number: row.try_get("contact_number")?,
            address: row.try_get("address")?,
            role: Role::from_user_type(&user_type),
            profile_photo: row.try_get("profile_photo")?,
        },
        password_hash: row.try_get("password_hash")?,
    })
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create(&self, user: NewUser) -> Result<UserId, DomainError> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE lower(email) = lower($1))",
        )
        .bind(&user.email)
        .fetch_one(self.pool())
        .await
        .map_err(storage)?;
        if taken {
            return Err(DomainError::Validation("email is already registered".into()));
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (full_name, email, password_hash, contact_number, address, user_type)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING user_id",
        )
        .bind(user.full_name)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.contact_number)
        .bind(user.address)
        .bind(Role::Member.as_user_type())
        .fetch_one(self.pool())
        .await
        .map_err(|e| match e {
            // lost a race against a concurrent registration
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DomainError::Validation("email is already registered".into())
            }
            other => storage(other),
        })?;
        Ok(UserId(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query(
            "SELECT user_id, full_name, email, COALESCE(password_hash, '') AS password_hash,
                    contact_number, address, user_type, profile_photo
             FROM users WHERE lower(email) = lower($1)
             ORDER BY user_id
             LIMIT 1",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(storage)?;

        row.as_ref()
            .map(account_from_row)
            .transpose()
            .map_err(storage)
    }
}
