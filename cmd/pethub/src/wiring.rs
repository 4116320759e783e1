//! Chooses adapter implementations from settings and enabled features.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::Ports;
use auth_adapters::{hash_password, Argon2Hasher, JwtAuthenticator};
use configs::{BootstrapSettings, Settings, StorageBackend};
use domains::{Mailer, Role, User, UserId};
use secrecy::ExposeSecret;
use notify_adapters::LogMailer;
use storage_adapters::{InMemoryStore, LocalMediaStore};
use tracing::{info, warn};

pub async fn build_ports(settings: &Settings) -> anyhow::Result<Ports> {
    let authenticator = Arc::new(JwtAuthenticator::new(
        &settings.auth.jwt_secret,
        chrono::Duration::hours(settings.auth.token_ttl_hours),
    ));
    let media = Arc::new(
        LocalMediaStore::new(settings.media.root.clone(), settings.media.url_prefix.as_str())
            .with_max_bytes(settings.media.max_upload_bytes),
    );
    let mailer = build_mailer(settings)?;
    let hasher = Arc::new(Argon2Hasher);

    match settings.database.backend {
        StorageBackend::Memory => {
            warn!("using the in-memory store; data is lost on restart");
            let store = Arc::new(InMemoryStore::new());
            bootstrap_admin(&store, &settings.bootstrap)?;
            Ok(Ports {
                users: store.clone(),
                applications: store.clone(),
                pets: store.clone(),
                reports: store.clone(),
                forum: store,
                mailer,
                media,
                authenticator,
                hasher,
            })
        }
        StorageBackend::Postgres => {
            let store = Arc::new(connect_postgres(settings).await?);
            Ok(Ports {
                users: store.clone(),
                applications: store.clone(),
                pets: store.clone(),
                reports: store.clone(),
                forum: store,
                mailer,
                media,
                authenticator,
                hasher,
            })
        }
    }
}

/// The in-memory store starts empty; without an admin nobody could
/// approve pets or list applications.
fn bootstrap_admin(store: &InMemoryStore, bootstrap: &BootstrapSettings) -> anyhow::Result<()> {
    let Some((email, password)) = bootstrap.admin_credentials() else {
        warn!("no bootstrap admin configured; admin-only routes are unreachable");
        return Ok(());
    };
    let hash = hash_password(password.expose_secret()).context("hashing bootstrap admin password")?;
    store.insert_account(
        User {
            id: UserId(1),
            full_name: bootstrap.admin_name.clone(),
            email: email.to_owned(),
            contact_number: None,
            address: None,
            role: Role::Admin,
            profile_photo: None,
        },
        hash,
    );
    info!(%email, "bootstrap admin created");
    Ok(())
}

#[cfg(feature = "db-postgres")]
async fn connect_postgres(settings: &Settings) -> anyhow::Result<storage_adapters::PgStore> {
    let url = settings
        .database
        .url
        .as_ref()
        .context("database.url is not set")?;
    let store = storage_adapters::PgStore::connect(
        url.expose_secret(),
        settings.database.max_connections,
    )
    .await
    .context("connecting to postgres")?;
    info!(max_connections = settings.database.max_connections, "postgres pool ready");
    Ok(store)
}

#[cfg(not(feature = "db-postgres"))]
async fn connect_postgres(_settings: &Settings) -> anyhow::Result<InMemoryStore> {
    anyhow::bail!("the postgres backend requires building with the `db-postgres` feature")
}

fn build_mailer(settings: &Settings) -> anyhow::Result<Arc<dyn Mailer>> {
    let mail = &settings.mail;
    match &mail.relay_url {
        #[cfg(feature = "mail-relay")]
        Some(url) => {
            use secrecy::SecretString;

            let api_key = mail
                .api_key
                .as_ref()
                .map(|key| SecretString::from(key.expose_secret().to_owned()));
            let relay = notify_adapters::RelayMailer::new(
                url.as_str(),
                api_key,
                mail.from.as_str(),
                std::time::Duration::from_millis(mail.timeout_ms),
            )
            .context("building mail relay client")?;
            info!(relay = %url, "mail goes through the HTTP relay");
            Ok(Arc::new(relay))
        }
        #[cfg(not(feature = "mail-relay"))]
        Some(_) => {
            warn!("mail.relay_url is set but `mail-relay` is not enabled; logging mail instead");
            Ok(Arc::new(LogMailer::new(mail.from.as_str())))
        }
        None => {
            info!("no mail relay configured; mail is logged only");
            Ok(Arc::new(LogMailer::new(mail.from.as_str())))
        }
    }
}
