//! In-memory implementation of every repository port.
//!
//! Joins are resolved on read the same way the SQL adapter resolves them:
//! a row whose referenced user or pet is gone drops out of joined views.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use domains::{
    Account, Application, ApplicationContext, ApplicationId, ApplicationRepository,
    ApplicationStatus, ApplicationSummary, Comment, CommentId, DomainError, ForumRepository,
    NewApplication, NewComment, NewPet, NewPost, NewReport, NewUser, Page, PageRequest, Pet,
    PetDetails, PetId, PetRepository, Post, PostChanges, PostId, Report, ReportChanges, ReportId,
    ReportRepository, Role, User, UserId, UserRepository, AVAILABILITY_AVAILABLE,
    REPORT_STATUS_OPEN,
};

#[derive(Debug)]
pub struct InMemoryStore {
    users: DashMap<UserId, User>,
    /// Lowercased email to owner; the unique index of `users.email`.
    emails: DashMap<String, UserId>,
    passwords: DashMap<UserId, String>,
    pets: DashMap<PetId, Pet>,
    applications: DashMap<ApplicationId, Application>,
    reports: DashMap<ReportId, Report>,
    posts: DashMap<PostId, Post>,
    comments: DashMap<CommentId, Comment>,
    next_id: AtomicI64,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            emails: DashMap::new(),
            passwords: DashMap::new(),
            pets: DashMap::new(),
            applications: DashMap::new(),
            reports: DashMap::new(),
            posts: DashMap::new(),
            comments: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    fn allocate(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Keeps generated ids clear of explicitly seeded ones.
    fn reserve(&self, id: i64) {
        self.next_id.fetch_max(id + 1, Ordering::SeqCst);
    }

    // Seeding helpers. Records are stored as given.

    pub fn insert_user(&self, user: User) {
        self.reserve(user.id.0);
        self.emails.insert(user.email.to_lowercase(), user.id);
        self.users.insert(user.id, user);
    }

    /// Seeds a user that can log in with the given password hash.
    pub fn insert_account(&self, user: User, password_hash: impl Into<String>) {
        self.passwords.insert(user.id, password_hash.into());
        self.insert_user(user);
    }

    pub fn insert_pet(&self, pet: Pet) {
        self.reserve(pet.id.0);
        self.pets.insert(pet.id, pet);
    }

    pub fn insert_application(&self, application: Application) {
        self.reserve(application.id.0);
        self.applications.insert(application.id, application);
    }

    pub fn insert_report(&self, report: Report) {
        self.reserve(report.id.0);
        self.reports.insert(report.id, report);
    }

    pub fn insert_post(&self, post: Post) {
        self.reserve(post.id.0);
        self.posts.insert(post.id, post);
    }

    pub fn insert_comment(&self, comment: Comment) {
        self.reserve(comment.id.0);
        self.comments.insert(comment.id, comment);
    }

    // Inspection helpers, mostly for assertions.

    pub fn pet(&self, id: PetId) -> Option<Pet> {
        self.pets.get(&id).map(|p| p.clone())
    }

    pub fn application(&self, id: ApplicationId) -> Option<Application> {
        self.applications.get(&id).map(|a| a.clone())
    }

    pub fn report(&self, id: ReportId) -> Option<Report> {
        self.reports.get(&id).map(|r| r.clone())
    }

    pub fn post(&self, id: PostId) -> Option<Post> {
        self.posts.get(&id).map(|p| p.clone())
    }

    pub fn comment(&self, id: CommentId) -> Option<Comment> {
        self.comments.get(&id).map(|c| c.clone())
    }

    pub fn user(&self, id: UserId) -> Option<User> {
        self.users.get(&id).map(|u| u.clone())
    }

    fn summarize(&self, application: Application) -> Option<ApplicationSummary> {
        let pet = self.pet(application.pet_id)?;
        let applicant = self.user(application.applicant_id)?;
        Some(ApplicationSummary {
            application,
            pet_name: pet.name,
            pet_photos: pet.photos,
            applicant_name: applicant.full_name,
            applicant_email: applicant.email,
            applicant_address: applicant.address,
            applicant_contact_number: applicant.contact_number,
            applicant_profile_photo: applicant.profile_photo,
        })
    }

    fn snapshot_applications(&self) -> Vec<Application> {
        self.applications.iter().map(|e| e.value().clone()).collect()
    }
}

fn newest_first(a: &ApplicationSummary, b: &ApplicationSummary) -> std::cmp::Ordering {
    b.application
        .date_submitted
        .cmp(&a.application.date_submitted)
        .then(b.application.id.cmp(&a.application.id))
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[async_trait]
impl ApplicationRepository for InMemoryStore {
    async fn create(&self, application: NewApplication) -> Result<ApplicationId, DomainError> {
        if !self.pets.contains_key(&application.pet_id) {
            return Err(DomainError::Storage(format!(
                "pet {} does not exist",
                application.pet_id
            )));
        }
        let id = ApplicationId(self.allocate());
        self.applications.insert(
            id,
            Application {
                id,
                applicant_id: application.applicant_id,
                pet_id: application.pet_id,
                answers: application.answers,
                status: ApplicationStatus::Pending,
                date_submitted: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn find(&self, id: ApplicationId) -> Result<Option<Application>, DomainError> {
        Ok(self.application(id))
    }

    async fn set_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), DomainError> {
        if let Some(mut application) = self.applications.get_mut(&id) {
            application.status = status;
        }
        Ok(())
    }

    async fn context(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ApplicationContext>, DomainError> {
        let Some(application) = self.application(id) else {
            return Ok(None);
        };
        let Some(pet) = self.pet(application.pet_id) else {
            return Ok(None);
        };
        let (Some(applicant), Some(owner)) =
            (self.user(application.applicant_id), self.user(pet.owner_id))
        else {
            return Ok(None);
        };

        Ok(Some(ApplicationContext {
            application_id: application.id,
            status: application.status,
            pet_id: pet.id,
            pet_name: pet.name,
            pet_owner_id: pet.owner_id,
            applicant_id: applicant.id,
            applicant_name: applicant.full_name,
            applicant_email: applicant.email,
            owner_email: owner.email,
            owner_contact_number: owner.contact_number,
            owner_address: owner.address,
        }))
    }

    async fn delete(&self, id: ApplicationId) -> Result<bool, DomainError> {
        Ok(self.applications.remove(&id).is_some())
    }

    async fn list_for_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<ApplicationSummary>, DomainError> {
        let mut rows: Vec<ApplicationSummary> = self
            .snapshot_applications()
            .into_iter()
            .filter(|a| self.pet(a.pet_id).is_some_and(|p| p.owner_id == owner))
            .filter_map(|a| self.summarize(a))
            .collect();
        rows.sort_by(newest_first);
        Ok(rows)
    }

    async fn list_all(
        &self,
        request: PageRequest,
    ) -> Result<Page<ApplicationSummary>, DomainError> {
        let needle = request.search.as_deref().map(str::to_lowercase);
        let mut rows: Vec<ApplicationSummary> = self
            .snapshot_applications()
            .into_iter()
            .filter_map(|a| self.summarize(a))
            .filter(|s| match &needle {
                Some(n) => {
                    contains_ignore_case(&s.pet_name, n) || contains_ignore_case(&s.applicant_name, n)
                }
                None => true,
            })
            .collect();
        rows.sort_by(newest_first);

        let total_count = rows.len() as u64;
        let items = rows
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.limit() as usize)
            .collect();
        Ok(Page { items, total_count })
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> Result<UserId, DomainError> {
        let id = match self.emails.entry(user.email.to_lowercase()) {
            Entry::Occupied(_) => {
                return Err(DomainError::Validation(
                    "email is already registered".to_owned(),
                ))
            }
            Entry::Vacant(slot) => {
                let id = UserId(self.allocate());
                slot.insert(id);
                id
            }
        };
        self.passwords.insert(id, user.password_hash);
        self.users.insert(
            id,
            User {
                id,
                full_name: user.full_name,
                email: user.email,
                contact_number: user.contact_number,
                address: user.address,
                role: Role::Member,
                profile_photo: None,
            },
        );
        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let Some(id) = self.emails.get(&email.to_lowercase()).map(|e| *e.value()) else {
            return Ok(None);
        };
        Ok(self.user(id).map(|user| Account {
            password_hash: self
                .passwords
                .get(&id)
                .map(|h| h.clone())
                .unwrap_or_default(),
            user,
        }))
    }
}

#[async_trait]
impl PetRepository for InMemoryStore {
    async fn create(&self, pet: NewPet) -> Result<PetId, DomainError> {
        if !self.users.contains_key(&pet.owner_id) {
            return Err(DomainError::Storage(format!(
                "user {} does not exist",
                pet.owner_id
            )));
        }
        let id = PetId(self.allocate());
        self.pets.insert(
            id,
            Pet {
                id,
                owner_id: pet.owner_id,
                name: pet.name,
                pet_type: pet.pet_type,
                species: pet.species,
                breed: pet.breed,
                description: pet.description,
                is_approved: false,
                availability: Some(AVAILABILITY_AVAILABLE.to_owned()),
                photos: pet.photos,
                vaccination_certificates: pet.vaccination_certificates,
                date_added: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn find_details(&self, id: PetId) -> Result<Option<PetDetails>, DomainError> {
        let Some(pet) = self.pet(id) else {
            return Ok(None);
        };
        let Some(owner) = self.user(pet.owner_id) else {
            return Ok(None);
        };

        let new_owner_full_name = self
            .snapshot_applications()
            .into_iter()
            .filter(|a| a.pet_id == id && a.status == ApplicationStatus::Approved)
            .max_by_key(|a| (a.date_submitted, a.id))
            .and_then(|a| self.user(a.applicant_id))
            .map(|u| u.full_name);

        Ok(Some(PetDetails {
            pet,
            owner_full_name: owner.full_name,
            owner_email: owner.email,
            new_owner_full_name,
        }))
    }

    async fn set_availability(&self, id: PetId, availability: &str) -> Result<(), DomainError> {
        if let Some(mut pet) = self.pets.get_mut(&id) {
            pet.availability = Some(availability.to_owned());
        }
        Ok(())
    }

    async fn set_approval(&self, id: PetId, approved: bool) -> Result<bool, DomainError> {
        Ok(self
            .pets
            .get_mut(&id)
            .map(|mut pet| pet.is_approved = approved)
            .is_some())
    }
}

#[async_trait]
impl ReportRepository for InMemoryStore {
    async fn create(&self, report: NewReport) -> Result<ReportId, DomainError> {
        let id = ReportId(self.allocate());
        self.reports.insert(
            id,
            Report {
                id,
                reporter_id: report.reporter_id,
                report_type: report.report_type,
                description: report.description,
                location: report.location,
                contact_info: report.contact_info,
                photos: report.photos,
                status: REPORT_STATUS_OPEN.to_owned(),
                date_reported: Utc::now(),
                reporter_full_name: None,
            },
        );
        Ok(id)
    }

    async fn find(&self, id: ReportId) -> Result<Option<Report>, DomainError> {
        Ok(self.report(id).map(|mut r| {
            r.reporter_full_name = self.user(r.reporter_id).map(|u| u.full_name);
            r
        }))
    }

    async fn list_by_reporter(&self, reporter: UserId) -> Result<Vec<Report>, DomainError> {
        let name = self.user(reporter).map(|u| u.full_name);
        let mut reports: Vec<Report> = self
            .reports
            .iter()
            .filter(|e| e.reporter_id == reporter)
            .map(|e| {
                let mut r = e.value().clone();
                r.reporter_full_name = name.clone();
                r
            })
            .collect();
        reports.sort_by(|a, b| b.date_reported.cmp(&a.date_reported).then(b.id.cmp(&a.id)));
        Ok(reports)
    }

    async fn update(&self, id: ReportId, changes: ReportChanges) -> Result<(), DomainError> {
        if let Some(mut report) = self.reports.get_mut(&id) {
            report.apply(changes);
        }
        Ok(())
    }

    async fn delete(&self, id: ReportId) -> Result<bool, DomainError> {
        Ok(self.reports.remove(&id).is_some())
    }
}

#[async_trait]
impl ForumRepository for InMemoryStore {
    async fn create_post(&self, post: NewPost) -> Result<PostId, DomainError> {
        let id = PostId(self.allocate());
        self.posts.insert(
            id,
            Post {
                id,
                author_id: post.author_id,
                category_id: post.category_id,
                title: post.title,
                content: post.content,
                images: post.images,
                post_date: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn find_post(&self, id: PostId) -> Result<Option<Post>, DomainError> {
        Ok(self.post(id))
    }

    async fn update_post(&self, id: PostId, changes: PostChanges) -> Result<(), DomainError> {
        if let Some(mut post) = self.posts.get_mut(&id) {
            post.title = changes.title;
            post.content = changes.content;
            post.images = changes.images;
        }
        Ok(())
    }

    async fn delete_post(&self, id: PostId) -> Result<bool, DomainError> {
        let removed = self.posts.remove(&id).is_some();
        if removed {
            self.comments.retain(|_, c| c.post_id != id);
        }
        Ok(removed)
    }

    async fn create_comment(&self, comment: NewComment) -> Result<CommentId, DomainError> {
        if !self.posts.contains_key(&comment.post_id) {
            return Err(DomainError::Storage(format!(
                "post {} does not exist",
                comment.post_id
            )));
        }
        let id = CommentId(self.allocate());
        self.comments.insert(
            id,
            Comment {
                id,
                post_id: comment.post_id,
                commenter_id: comment.commenter_id,
                content: comment.content,
                comment_date: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn find_comment(&self, id: CommentId) -> Result<Option<Comment>, DomainError> {
        Ok(self.comment(id))
    }

    async fn update_comment(&self, id: CommentId, content: String) -> Result<(), DomainError> {
        if let Some(mut comment) = self.comments.get_mut(&id) {
            comment.content = content;
        }
        Ok(())
    }

    async fn delete_comment(&self, id: CommentId) -> Result<bool, DomainError> {
        Ok(self.comments.remove(&id).is_some())
    }
}
