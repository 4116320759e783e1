//! Behaviour every repository adapter must share. Always run against the
//! in-memory store; with `--features pg-contracts` the same functions run
//! against `PgStore` on a throwaway Postgres container (needs docker).

use std::sync::Arc;

use chrono::{Duration, Utc};
use domains::{
    ApplicationAnswers, ApplicationRepository, ApplicationStatus, CategoryId, CommentId,
    DomainError, ForumRepository, MockMailer, NewApplication, NewComment, NewPet, NewPost,
    NewReport, NewUser, PageRequest, Pet, PetId, PetRepository, PhotoList, PostChanges, PostId,
    Principal, ReportChanges, ReportRepository, Role, User, UserId, UserRepository,
};
use mockall::predicate::function;
use services::{
    ApplicationService, NotificationDispatcher, PetStatusSynchronizer, SideEffect,
};
use storage_adapters::InMemoryStore;

const OWNER: UserId = UserId(2);
const APPLICANT: UserId = UserId(3);
const PET: PetId = PetId(7);
const CATEGORY: CategoryId = CategoryId(1);

fn user(id: UserId, name: &str) -> User {
    User {
        id,
        full_name: name.into(),
        email: format!("{}@example.com", id.0),
        contact_number: None,
        address: None,
        role: Role::Member,
        profile_photo: None,
    }
}

fn pet(id: PetId, name: &str) -> Pet {
    Pet {
        id,
        owner_id: OWNER,
        name: name.into(),
        pet_type: Some("Cat".into()),
        species: None,
        breed: None,
        description: None,
        is_approved: true,
        availability: Some("Available".into()),
        photos: PhotoList::default(),
        vaccination_certificates: PhotoList::default(),
        date_added: Utc::now() - Duration::days(3),
    }
}

fn store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.insert_user(user(OWNER, "Olga Santos"));
    store.insert_user(user(APPLICANT, "Ana Reyes"));
    store.insert_pet(pet(PET, "Mingming"));
    store
}

fn application_for(pet_id: PetId) -> NewApplication {
    NewApplication {
        applicant_id: APPLICANT,
        pet_id,
        answers: ApplicationAnswers::default(),
    }
}

async fn applications_start_pending_and_statuses_overwrite(repo: &dyn ApplicationRepository) {
    let id = repo.create(application_for(PET)).await.unwrap();
    let stored = repo.find(id).await.unwrap().unwrap();
    assert_eq!(stored.status, ApplicationStatus::Pending);

    repo.set_status(id, ApplicationStatus::Approved).await.unwrap();
    repo.set_status(id, ApplicationStatus::Declined).await.unwrap();
    let context = repo.context(id).await.unwrap().unwrap();
    assert_eq!(context.status, ApplicationStatus::Declined);
    assert_eq!(context.pet_owner_id, OWNER);
    assert_eq!(context.applicant_name, "Ana Reyes");

    assert!(repo.delete(id).await.unwrap());
    assert!(!repo.delete(id).await.unwrap());
    assert!(repo.context(id).await.unwrap().is_none());
}

async fn application_for_unknown_pet_is_refused(repo: &dyn ApplicationRepository) {
    let err = repo.create(application_for(PetId(999))).await.unwrap_err();
    assert!(!err.is_client_error(), "{err}");
}

async fn search_matches_pet_or_applicant_case_insensitively(repo: &dyn ApplicationRepository) {
    repo.create(application_for(PET)).await.unwrap();

    for needle in ["MINGMING", "reyes"] {
        let page = repo
            .list_all(PageRequest::new(1, 10, Some(needle.into())))
            .await
            .unwrap();
        assert_eq!(page.total_count, 1, "{needle}");
    }
    let page = repo
        .list_all(PageRequest::new(1, 10, Some("nobody".into())))
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);
    assert!(page.items.is_empty());
}

async fn availability_write_is_visible_in_details(repo: &dyn PetRepository) {
    repo.set_availability(PET, "Adopted").await.unwrap();
    let details = repo.find_details(PET).await.unwrap().unwrap();
    assert!(details.pet.is_adopted());
    assert_eq!(details.owner_full_name, "Olga Santos");
    assert!(repo.find_details(PetId(404)).await.unwrap().is_none());
}

async fn report_update_keeps_unset_fields(repo: &dyn ReportRepository) {
    let id = repo
        .create(NewReport {
            reporter_id: APPLICANT,
            report_type: "Lost".into(),
            description: Some("Grey tabby".into()),
            location: Some("Talisay".into()),
            contact_info: None,
            photos: PhotoList::new(vec!["uploads/a.jpg".into()]),
        })
        .await
        .unwrap();

    repo.update(
        id,
        ReportChanges {
            status: Some("Found".into()),
            photos: PhotoList::new(vec!["uploads/a.jpg".into(), "uploads/b.jpg".into()]),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let report = repo.find(id).await.unwrap().unwrap();
    assert_eq!(report.status, "Found");
    assert_eq!(report.location.as_deref(), Some("Talisay"));
    assert_eq!(report.photos.len(), 2);
    assert_eq!(report.reporter_full_name.as_deref(), Some("Ana Reyes"));
}

async fn missing_forum_rows_read_as_none(repo: &dyn ForumRepository) {
    assert!(repo.find_post(PostId(1)).await.unwrap().is_none());
    assert!(!repo.delete_post(PostId(1)).await.unwrap());
    // updating a vanished row is a silent no-op
    repo.update_post(
        PostId(1),
        PostChanges {
            title: "t".into(),
            content: "c".into(),
            images: PhotoList::default(),
        },
    )
    .await
    .unwrap();
    assert!(repo.find_post(PostId(1)).await.unwrap().is_none());
}

async fn search_treats_wildcards_as_text<S>(store: &S)
where
    S: ApplicationRepository + PetRepository,
{
    let sale = PetRepository::create(store, new_pet("50%_off Tabby")).await.unwrap();
    ApplicationRepository::create(store, application_for(sale)).await.unwrap();
    ApplicationRepository::create(store, application_for(PET)).await.unwrap();

    for needle in ["%", "_", "0%_o"] {
        let page = store
            .list_all(PageRequest::new(1, 10, Some(needle.into())))
            .await
            .unwrap();
        assert_eq!(page.total_count, 1, "{needle}");
        assert_eq!(page.items[0].pet_name, "50%_off Tabby");
    }
    // "n_m" would match "Mingming" as a pattern
    let page = store
        .list_all(PageRequest::new(1, 10, Some("n_m".into())))
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);
}

fn new_pet(name: &str) -> NewPet {
    NewPet {
        owner_id: OWNER,
        name: name.into(),
        pet_type: Some("Cat".into()),
        species: None,
        breed: None,
        description: None,
        photos: PhotoList::new(vec!["uploads/cat.jpg".into()]),
        vaccination_certificates: PhotoList::new(vec!["uploads/card.pdf".into()]),
    }
}

async fn new_pets_wait_for_review(repo: &dyn PetRepository) {
    let id = repo.create(new_pet("Kiko")).await.unwrap();
    let details = repo.find_details(id).await.unwrap().unwrap();
    assert!(!details.pet.is_approved);
    assert_eq!(details.pet.availability.as_deref(), Some("Available"));
    assert_eq!(details.pet.vaccination_certificates.len(), 1);
    assert_eq!(details.owner_full_name, "Olga Santos");

    assert!(repo.set_approval(id, true).await.unwrap());
    assert!(repo.find_details(id).await.unwrap().unwrap().pet.is_approved);
    assert!(!repo.set_approval(PetId(404), true).await.unwrap());

    let orphan = NewPet {
        owner_id: UserId(404),
        ..new_pet("Nobody's")
    };
    let err = repo.create(orphan).await.unwrap_err();
    assert!(!err.is_client_error(), "{err}");
}

fn new_user(name: &str, email: &str) -> NewUser {
    NewUser {
        full_name: name.into(),
        email: email.into(),
        password_hash: "$argon2id$stored".into(),
        contact_number: None,
        address: None,
    }
}

async fn emails_register_once_in_any_case(repo: &dyn UserRepository) {
    let id = repo
        .create(new_user("Carla Diaz", "carla@example.com"))
        .await
        .unwrap();
    let account = repo.find_by_email("CARLA@example.com").await.unwrap().unwrap();
    assert_eq!(account.user.id, id);
    assert_eq!(account.user.role, Role::Member);
    assert_eq!(account.password_hash, "$argon2id$stored");

    let err = repo
        .create(new_user("Someone Else", "Carla@Example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)), "{err}");

    assert!(repo.find_by_email("ghost@example.com").await.unwrap().is_none());
    // seeded rows carry no password
    let seeded = repo.find_by_email("3@example.com").await.unwrap().unwrap();
    assert_eq!(seeded.user.id, APPLICANT);
    assert!(seeded.password_hash.is_empty());
}

async fn posts_keep_image_order_and_take_comments(repo: &dyn ForumRepository) {
    let post = repo
        .create_post(NewPost {
            author_id: APPLICANT,
            category_id: CATEGORY,
            title: "Found a litter".into(),
            content: "Three kittens".into(),
            images: PhotoList::new(vec!["uploads/b.jpg".into(), "uploads/a.jpg".into()]),
        })
        .await
        .unwrap();
    let stored = repo.find_post(post).await.unwrap().unwrap();
    assert_eq!(stored.author_id, APPLICANT);
    let images: Vec<String> = stored.images.into_iter().collect();
    assert_eq!(images, ["uploads/b.jpg", "uploads/a.jpg"]);

    let comment = repo
        .create_comment(NewComment {
            post_id: post,
            commenter_id: OWNER,
            content: "Bring them to the shelter".into(),
        })
        .await
        .unwrap();
    assert_eq!(
        repo.find_comment(comment).await.unwrap().unwrap().content,
        "Bring them to the shelter"
    );

    let err = repo
        .create_comment(NewComment {
            post_id: PostId(999),
            commenter_id: OWNER,
            content: "Hello?".into(),
        })
        .await
        .unwrap_err();
    assert!(!err.is_client_error(), "{err}");

    assert!(repo.delete_post(post).await.unwrap());
    assert!(repo.find_comment(comment).await.unwrap().is_none());
    assert!(repo.find_comment(CommentId(999)).await.unwrap().is_none());
}

#[tokio::test]
async fn in_memory_store_honours_the_application_contract() {
    applications_start_pending_and_statuses_overwrite(&store()).await;
    application_for_unknown_pet_is_refused(&store()).await;
    search_matches_pet_or_applicant_case_insensitively(&store()).await;
    search_treats_wildcards_as_text(&store()).await;
}

#[tokio::test]
async fn in_memory_store_honours_the_pet_contract() {
    availability_write_is_visible_in_details(&store()).await;
    new_pets_wait_for_review(&store()).await;
}

#[tokio::test]
async fn in_memory_store_honours_the_user_contract() {
    emails_register_once_in_any_case(&store()).await;
}

#[tokio::test]
async fn in_memory_store_honours_the_report_contract() {
    report_update_keeps_unset_fields(&store()).await;
}

#[tokio::test]
async fn in_memory_store_honours_the_forum_contract() {
    missing_forum_rows_read_as_none(&store()).await;
    posts_keep_image_order_and_take_comments(&store()).await;
}

#[test]
fn approval_over_the_in_memory_store_notifies_the_applicant() {
    tokio_test::block_on(async {
        let store = Arc::new(store());
        let id = ApplicationRepository::create(&*store, application_for(PET))
            .await
            .unwrap();

        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .with(function(|m: &domains::OutboundMessage| {
                m.to == "3@example.com" && m.subject.contains("Mingming")
            }))
            .times(1)
            .returning(|_| Ok(()));

        let service = ApplicationService::new(
            store.clone(),
            PetStatusSynchronizer::new(store.clone()),
            NotificationDispatcher::new(Arc::new(mailer)),
        );
        let change = service
            .update_status(&Principal::new(OWNER, Role::Member), id, ApplicationStatus::Approved)
            .await
            .unwrap();

        assert_eq!(change.cascade, SideEffect::Applied);
        assert_eq!(change.notification.outcome().await, SideEffect::Applied);
        assert!(store.pet(PET).unwrap().is_adopted());
    });
}

#[cfg(feature = "pg-contracts")]
mod postgres {
    use super::*;
    use sqlx::PgPool;
    use storage_adapters::PgStore;
    use testcontainers::runners::AsyncRunner;
    use testcontainers::ContainerAsync;
    use testcontainers_modules::postgres::Postgres;

    /// One container per test; every contract gets its own database.
    struct Server {
        _container: ContainerAsync<Postgres>,
        url: String,
    }

    impl Server {
        async fn start() -> Self {
            let container = Postgres::default()
                .start()
                .await
                .expect("docker is needed for the Postgres contracts");
            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();
            Self {
                _container: container,
                url: format!("postgres://postgres:postgres@{host}:{port}"),
            }
        }

        async fn store(&self, database: &str) -> PgStore {
            let admin = PgPool::connect(&format!("{}/postgres", self.url))
                .await
                .unwrap();
            sqlx::query(&format!("CREATE DATABASE {database}"))
                .execute(&admin)
                .await
                .unwrap();
            let store = PgStore::connect(&format!("{}/{database}", self.url), 4)
                .await
                .unwrap();
            seed(store.pool()).await;
            store
        }
    }

    /// Same fixtures as the in-memory `store()`.
    async fn seed(pool: &PgPool) {
        for (id, name) in [(OWNER, "Olga Santos"), (APPLICANT, "Ana Reyes")] {
            sqlx::query("INSERT INTO users (user_id, full_name, email) VALUES ($1, $2, $3)")
                .bind(id.0)
                .bind(name)
                .bind(format!("{}@example.com", id.0))
                .execute(pool)
                .await
                .unwrap();
        }
        sqlx::query(
            "INSERT INTO pets (pet_id, owner_id, pet_name, pet_type, is_approved, status, date_added)
             VALUES ($1, $2, 'Mingming', 'Cat', TRUE, 'Available', now() - interval '3 days')",
        )
        .bind(PET.0)
        .bind(OWNER.0)
        .execute(pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO categories (category_id, name) VALUES ($1, 'General')")
            .bind(CATEGORY.0)
            .execute(pool)
            .await
            .unwrap();

        for (table, key) in [("users", "user_id"), ("pets", "pet_id"), ("categories", "category_id")] {
            sqlx::query(&format!(
                "SELECT setval(pg_get_serial_sequence('{table}', '{key}'), (SELECT MAX({key}) FROM {table}))"
            ))
            .execute(pool)
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn pg_store_honours_the_application_contract() {
        let server = Server::start().await;
        applications_start_pending_and_statuses_overwrite(&server.store("lifecycle").await).await;
        application_for_unknown_pet_is_refused(&server.store("unknown_pet").await).await;
        search_matches_pet_or_applicant_case_insensitively(&server.store("search").await).await;
        search_treats_wildcards_as_text(&server.store("wildcards").await).await;
    }

    #[tokio::test]
    async fn pg_store_honours_the_pet_contract() {
        let server = Server::start().await;
        availability_write_is_visible_in_details(&server.store("availability").await).await;
        new_pets_wait_for_review(&server.store("review").await).await;
    }

    #[tokio::test]
    async fn pg_store_honours_the_user_contract() {
        let server = Server::start().await;
        emails_register_once_in_any_case(&server.store("users").await).await;
    }

    #[tokio::test]
    async fn pg_store_honours_the_report_contract() {
        let server = Server::start().await;
        report_update_keeps_unset_fields(&server.store("reports").await).await;
    }

    #[tokio::test]
    async fn pg_store_honours_the_forum_contract() {
        let server = Server::start().await;
        missing_forum_rows_read_as_none(&server.store("forum_missing").await).await;
        posts_keep_image_order_and_take_comments(&server.store("forum_posts").await).await;
    }

    /// Photo columns written by other clients come back lossy, never as an error.
    #[tokio::test]
    async fn pg_store_reads_malformed_photo_columns_as_empty() {
        let server = Server::start().await;
        let store = server.store("lossy_photos").await;
        sqlx::query(r#"UPDATE pets SET pet_photo = '{"not": "a list"}'::jsonb WHERE pet_id = $1"#)
            .bind(PET.0)
            .execute(store.pool())
            .await
            .unwrap();
        sqlx::query(r#"UPDATE pets SET vaccination_certificate = '"[\"uploads/card.pdf\"]"'::jsonb WHERE pet_id = $1"#)
            .bind(PET.0)
            .execute(store.pool())
            .await
            .unwrap();

        let details = store.find_details(PET).await.unwrap().unwrap();
        assert!(details.pet.photos.is_empty());
        let certificates: Vec<String> = details.pet.vaccination_certificates.into_iter().collect();
        assert_eq!(certificates, ["uploads/card.pdf"]);
    }
}
