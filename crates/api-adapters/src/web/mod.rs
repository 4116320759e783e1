//! axum router and shared state.

mod error;
mod extract;
pub mod handlers;
mod upload;

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, patch, post, put};
use axum::Router;
use domains::{
    ApplicationRepository, Authenticator, ForumRepository, Mailer, MediaStore, PasswordHasher,
    PetRepository, ReportRepository, UserRepository,
};
use services::{
    AccountService, ApplicationService, ForumService, NotificationDispatcher, PetService,
    PetStatusSynchronizer, ReportService,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use error::ApiError;
pub use extract::{ApiJson, ApiPath, ApiQuery, AuthUser};

use crate::metrics::Metrics;
use handlers::{accounts, applications, forum, health, pets, reports};

/// Driven ports the HTTP layer is assembled from.
pub struct Ports {
    pub users: Arc<dyn UserRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub pets: Arc<dyn PetRepository>,
    pub reports: Arc<dyn ReportRepository>,
    pub forum: Arc<dyn ForumRepository>,
    pub mailer: Arc<dyn Mailer>,
    pub media: Arc<dyn MediaStore>,
    pub authenticator: Arc<dyn Authenticator>,
    pub hasher: Arc<dyn PasswordHasher>,
}

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub applications: ApplicationService,
    pub pets: PetService,
    pub reports: ReportService,
    pub forum: ForumService,
    pub media: Arc<dyn MediaStore>,
    pub authenticator: Arc<dyn Authenticator>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn from_ports(ports: Ports) -> Self {
        let notifier = NotificationDispatcher::new(ports.mailer);
        let applications = ApplicationService::new(
            ports.applications,
            PetStatusSynchronizer::new(Arc::clone(&ports.pets)),
            notifier.clone(),
        );
        Self {
            accounts: AccountService::new(
                ports.users,
                ports.hasher,
                Arc::clone(&ports.authenticator),
            ),
            applications,
            pets: PetService::new(ports.pets, notifier),
            reports: ReportService::new(ports.reports),
            forum: ForumService::new(ports.forum),
            media: ports.media,
            authenticator: ports.authenticator,
            metrics: Arc::new(Metrics::new()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Single allowed origin; any origin when `None`.
    pub cors_origin: Option<String>,
    pub body_limit_bytes: usize,
    /// Serves stored uploads at `/{prefix}` from the given directory.
    pub uploads: Option<(String, PathBuf)>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            cors_origin: None,
            body_limit_bytes: 4 * 1024 * 1024,
            uploads: None,
        }
    }
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => base.allow_origin(value),
        Some(Err(e)) => {
            warn!(error = %e, "invalid CORS origin, allowing any");
            base.allow_origin(Any)
        }
        None => base.allow_origin(Any),
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        .route(
            "/applications",
            post(applications::submit).get(applications::list_all),
        )
        .route(
            "/applications/{application_id}",
            axum::routing::delete(applications::delete),
        )
        .route(
            "/applications/{application_id}/status",
            patch(applications::update_status),
        )
        .route(
            "/applications/owner/{owner_id}",
            get(applications::for_owner),
        )
        .route("/my-pets/applications", get(applications::for_my_pets))
        .route("/pets", post(pets::create))
        .route("/pets/{pet_id}", get(pets::details))
        .route("/pets/{pet_id}/approve", post(pets::approve))
        .route("/pets/{pet_id}/decline", post(pets::decline))
        .route("/reports", post(reports::create))
        .route("/reports/{report_id}", get(reports::get).delete(reports::delete))
        .route("/my-reports", get(reports::mine))
        .route("/my-reports/{report_id}", patch(reports::update))
        .route("/forum/posts", post(forum::create_post))
        .route("/forum/comments", post(forum::create_comment))
        .route(
            "/forum/posts/{post_id}",
            put(forum::update_post).delete(forum::delete_post),
        )
        .route(
            "/forum/comments/{comment_id}",
            put(forum::update_comment).delete(forum::delete_comment),
        )
}

/// Builds the full application router.
pub fn router(state: AppState, options: RouterOptions) -> Router {
    let mut app = Router::new()
        .nest("/api", api_routes())
        .route("/healthz", get(health::healthz))
        .route("/metrics", get(health::metrics));

    if let Some((prefix, dir)) = options.uploads {
        app = app.nest_service(&format!("/{}", prefix.trim_matches('/')), ServeDir::new(dir));
    }

    app.layer(DefaultBodyLimit::max(options.body_limit_bytes))
        .layer(CompressionLayer::new())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors_layer(options.cors_origin.as_deref()))
        .with_state(state)
}
