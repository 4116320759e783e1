//! # Ports
//!
//! Any adapter must implement these traits to be wired into the binary.
//! Mocks are generated for all of them under the `testing` feature.

use async_trait::async_trait;
use bytes::Bytes;
use mime::Mime;

use crate::errors::Result;
use crate::models::{
    Account, Application, ApplicationContext, ApplicationId, ApplicationStatus,
    ApplicationSummary, Comment, CommentId, NewApplication, NewComment, NewPet, NewPost,
    NewReport, NewUser, OutboundMessage, Page, PageRequest, PetDetails, PetId, Post, PostChanges,
    PostId, Principal, Report, ReportChanges, ReportId, UserId,
};

/// Persistence contract for adoption applications.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn create(&self, application: NewApplication) -> Result<ApplicationId>;
    async fn find(&self, id: ApplicationId) -> Result<Option<Application>>;

    /// Unconditional write; succeeds even when no row matches.
    async fn set_status(&self, id: ApplicationId, status: ApplicationStatus) -> Result<()>;

    /// Joins application, pet, applicant and pet owner.
    async fn context(&self, id: ApplicationId) -> Result<Option<ApplicationContext>>;

    /// Returns `false` when no row was removed.
    async fn delete(&self, id: ApplicationId) -> Result<bool>;

    /// Applications targeting pets owned by `owner`.
    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<ApplicationSummary>>;

    /// Newest first, filtered on pet name or applicant name.
    async fn list_all(&self, request: PageRequest) -> Result<Page<ApplicationSummary>>;
}

/// Persistence contract for pets.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PetRepository: Send + Sync {
    /// Inserts an unapproved, available listing.
    async fn create(&self, pet: NewPet) -> Result<PetId>;
    async fn find_details(&self, id: PetId) -> Result<Option<PetDetails>>;
    async fn set_availability(&self, id: PetId, availability: &str) -> Result<()>;
    /// Returns `false` when no row matched.
    async fn set_approval(&self, id: PetId, approved: bool) -> Result<bool>;
}

/// Persistence contract for accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Validation` when the email is already registered.
    async fn create(&self, user: NewUser) -> Result<UserId>;
    /// Case-insensitive on the email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;
}

/// Persistence contract for lost/found reports.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn create(&self, report: NewReport) -> Result<ReportId>;
    async fn find(&self, id: ReportId) -> Result<Option<Report>>;
    async fn list_by_reporter(&self, reporter: UserId) -> Result<Vec<Report>>;
    async fn update(&self, id: ReportId, changes: ReportChanges) -> Result<()>;
    async fn delete(&self, id: ReportId) -> Result<bool>;
}

/// Persistence contract for forum posts and comments.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ForumRepository: Send + Sync {
    async fn create_post(&self, post: NewPost) -> Result<PostId>;
    async fn find_post(&self, id: PostId) -> Result<Option<Post>>;
    async fn update_post(&self, id: PostId, changes: PostChanges) -> Result<()>;
    async fn delete_post(&self, id: PostId) -> Result<bool>;

    /// Fails when the post does not exist.
    async fn create_comment(&self, comment: NewComment) -> Result<CommentId>;
    async fn find_comment(&self, id: CommentId) -> Result<Option<Comment>>;
    async fn update_comment(&self, id: CommentId, content: String) -> Result<()>;
    async fn delete_comment(&self, id: CommentId) -> Result<bool>;
}

/// Outbound mail transport. Implementations never retry.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: OutboundMessage) -> Result<()>;
}

/// Media storage contract for uploaded photos.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Saves raw bytes and returns the stored path to record on the entity.
    async fn save_upload(
        &self,
        data: Bytes,
        content_type: Mime,
        file_name: Option<String>,
    ) -> Result<String>;
}

/// Identity contract: turns a bearer credential into a principal and back.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, token: &str) -> Result<Principal>;
    fn issue_token(&self, principal: &Principal) -> Result<String>;
}

/// One-way password hashing. CPU-bound; async callers move it off the
/// runtime threads.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;
    /// `false` for a wrong password and for an unparseable hash alike.
    fn verify(&self, password: &str, hash: &str) -> bool;
}
