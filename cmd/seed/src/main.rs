//! Seeds a fresh database with an administrator account and the default
//! forum categories. Safe to re-run: existing rows are left untouched.
//!
//! Reads the regular `PETHUB__*` settings plus:
//! - `SEED_ADMIN_EMAIL` (default `admin@pethub.local`)
//! - `SEED_ADMIN_PASSWORD` (required)
//! - `SEED_ADMIN_NAME` (default `PetHub Admin`)

use anyhow::Context;
use auth_adapters::hash_password;
use configs::Settings;
use secrecy::ExposeSecret;
use storage_adapters::PgStore;
use tracing::info;

const DEFAULT_CATEGORIES: &[&str] = &[
    "General Discussion",
    "Adoption Stories",
    "Pet Care & Health",
    "Training & Behavior",
    "Lost & Found",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading configuration")?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(settings.log.level.as_str()))
        .init();

    let url = settings
        .database
        .url
        .as_ref()
        .context("database.url is required for seeding")?;
    let store = PgStore::connect(url.expose_secret(), 2)
        .await
        .context("connecting to postgres")?;

    let email = std::env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@pethub.local".into());
    let name = std::env::var("SEED_ADMIN_NAME").unwrap_or_else(|_| "PetHub Admin".into());
    let password = std::env::var("SEED_ADMIN_PASSWORD").context("SEED_ADMIN_PASSWORD is not set")?;
    let hash = hash_password(&password).context("hashing admin password")?;

    let inserted = sqlx::query(
        "INSERT INTO users (full_name, email, password_hash, user_type)
         VALUES ($1, $2, $3, 'Admin')
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(&name)
    .bind(&email)
    .bind(&hash)
    .execute(store.pool())
    .await?
    .rows_affected();
    info!(%email, created = inserted > 0, "admin account");

    for category in DEFAULT_CATEGORIES {
        sqlx::query("INSERT INTO categories (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(category)
            .execute(store.pool())
            .await?;
    }
    info!(count = DEFAULT_CATEGORIES.len(), "forum categories ensured");

    Ok(())
}
