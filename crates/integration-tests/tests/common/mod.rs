//! Shared fixtures: a seeded in-memory store, a recording mailer and a
//! router wired exactly as the binary wires it.
#![allow(dead_code)]

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use api_adapters::{router, AppState, Ports, RouterOptions};
use async_trait::async_trait;
use auth_adapters::{hash_password, Argon2Hasher, JwtAuthenticator};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use chrono::Utc;
use domains::{
    CategoryId, Comment, CommentId, DomainError, Mailer, MediaStore, OutboundMessage, Pet, PetId,
    PetRepository, PhotoList, Post, PostId, Report, ReportId, Role, User, UserId,
};
use mime::Mime;
use secrecy::SecretString;
use serde_json::Value;
use storage_adapters::InMemoryStore;
use tokio::sync::{mpsc, Mutex};
use tower::ServiceExt;

pub const ADMIN: UserId = UserId(1);
pub const OWNER: UserId = UserId(2);
pub const APPLICANT: UserId = UserId(3);
pub const STRANGER: UserId = UserId(4);
pub const SECOND_ADMIN: UserId = UserId(9);

pub const PET: PetId = PetId(7);
pub const REPORT: ReportId = ReportId(21);
pub const POST: PostId = PostId(8);
pub const COMMENT: CommentId = CommentId(40);

/// Captures every message handed to the transport.
pub struct RecordingMailer {
    tx: mpsc::UnboundedSender<OutboundMessage>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: OutboundMessage) -> Result<(), DomainError> {
        self.tx
            .send(message)
            .map_err(|e| DomainError::SoftDependency(e.to_string()))
    }
}

/// Keeps no bytes; returns a predictable path per file name and
/// remembers every path it handed out.
#[derive(Default)]
pub struct RecordingMedia {
    saved: StdMutex<Vec<String>>,
}

impl RecordingMedia {
    pub fn saved(&self) -> Vec<String> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for RecordingMedia {
    async fn save_upload(
        &self,
        _data: Bytes,
        _content_type: Mime,
        file_name: Option<String>,
    ) -> Result<String, DomainError> {
        let path = format!("uploads/{}", file_name.unwrap_or_else(|| "upload.bin".into()));
        self.saved.lock().unwrap().push(path.clone());
        Ok(path)
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub state: AppState,
    pub media: Arc<RecordingMedia>,
    auth: Arc<JwtAuthenticator>,
    outbox: Mutex<mpsc::UnboundedReceiver<OutboundMessage>>,
}

fn user(id: UserId, name: &str, role: Role) -> User {
    User {
        id,
        full_name: name.into(),
        email: format!("{}@example.com", name.split(' ').next().unwrap_or(name).to_lowercase()),
        contact_number: None,
        address: None,
        role,
        profile_photo: None,
    }
}

pub fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.insert_user(user(ADMIN, "Admin One", Role::Admin));
    store.insert_user(User {
        contact_number: Some("0917-555-0142".into()),
        address: Some("12 Mango Ave, Cebu City".into()),
        ..user(OWNER, "Olga Santos", Role::Member)
    });
    store.insert_user(user(APPLICANT, "Ana Reyes", Role::Member));
    store.insert_user(user(STRANGER, "Ben Cruz", Role::Member));
    store.insert_user(user(SECOND_ADMIN, "Admin Two", Role::Admin));

    store.insert_pet(Pet {
        id: PET,
        owner_id: OWNER,
        name: "Bantay".into(),
        pet_type: Some("Dog".into()),
        species: Some("Aspin".into()),
        breed: None,
        description: Some("Loyal and gentle".into()),
        is_approved: true,
        availability: Some("Available".into()),
        photos: PhotoList::new(vec!["uploads/bantay.jpg".into()]),
        vaccination_certificates: PhotoList::default(),
        date_added: Utc::now(),
    });

    store.insert_report(Report {
        id: REPORT,
        reporter_id: APPLICANT,
        report_type: "Lost".into(),
        description: Some("Brown tabby, answers to Mochi".into()),
        location: Some("Mactan".into()),
        contact_info: None,
        photos: PhotoList::new(vec!["uploads/a.jpg".into(), "uploads/b.jpg".into()]),
        status: "Open".into(),
        date_reported: Utc::now(),
        reporter_full_name: None,
    });

    store.insert_post(Post {
        id: POST,
        author_id: APPLICANT,
        category_id: CategoryId(1),
        title: "Vaccination schedule for kittens?".into(),
        content: "Our shelter kitten is 8 weeks old.".into(),
        images: PhotoList::new(vec!["uploads/kitten.jpg".into()]),
        post_date: Utc::now(),
    });
    store.insert_comment(Comment {
        id: COMMENT,
        post_id: POST,
        commenter_id: APPLICANT,
        content: "Ask your vet about the 9-week shot.".into(),
        comment_date: Utc::now(),
    });
    store
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(seeded_store());
        Self::build(store.clone(), store)
    }

    /// Same fixtures, but pet writes go through `pets`.
    pub fn with_pet_repository(pets: Arc<dyn PetRepository>) -> Self {
        Self::build(Arc::new(seeded_store()), pets)
    }

    fn build(store: Arc<InMemoryStore>, pets: Arc<dyn PetRepository>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let auth = Arc::new(JwtAuthenticator::new(
            &SecretString::from("integration-secret".to_owned()),
            chrono::Duration::hours(1),
        ));

        let media = Arc::new(RecordingMedia::default());

        let state = AppState::from_ports(Ports {
            users: store.clone(),
            applications: store.clone(),
            pets,
            reports: store.clone(),
            forum: store.clone(),
            mailer: Arc::new(RecordingMailer { tx }),
            media: media.clone(),
            authenticator: auth.clone(),
            hasher: Arc::new(Argon2Hasher),
        });

        Self {
            router: router(state.clone(), RouterOptions::default()),
            store,
            state,
            media,
            auth,
            outbox: Mutex::new(rx),
        }
    }

    /// Gives a seeded user a password to log in with.
    pub fn set_password(&self, id: UserId, password: &str) {
        let user = self.store.user(id).expect("seeded user");
        self.store.insert_account(user, hash_password(password).unwrap());
    }

    pub fn token(&self, user: UserId, role: Role) -> String {
        self.auth.issue(user, role).unwrap()
    }

    pub fn member(&self, user: UserId) -> String {
        self.token(user, Role::Member)
    }

    pub fn admin(&self) -> String {
        self.token(ADMIN, Role::Admin)
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn call(&self, method: Method, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Next delivered message; fails the test after two seconds.
    pub async fn next_mail(&self) -> OutboundMessage {
        let mut outbox = self.outbox.lock().await;
        tokio::time::timeout(Duration::from_secs(2), outbox.recv())
            .await
            .expect("no mail delivered in time")
            .expect("mail channel closed")
    }

    /// True when nothing is delivered within a short grace period.
    pub async fn no_mail(&self) -> bool {
        let mut outbox = self.outbox.lock().await;
        tokio::time::timeout(Duration::from_millis(100), outbox.recv())
            .await
            .is_err()
    }
}

/// Hand-built `multipart/form-data` body.
pub struct MultipartBody {
    boundary: &'static str,
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: "pethub-test-boundary",
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(self, method: Method, uri: &str, token: &str) -> Request<Body> {
        self.into_request_as(method, uri, Some(token))
    }

    pub fn into_request_as(mut self, method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", self.boundary),
            );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(self.body)).unwrap()
    }
}
