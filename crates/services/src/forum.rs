//! Forum post and comment mutation guards.

use std::sync::Arc;

use domains::{
    ensure_owner_or_admin, CategoryId, CommentId, DomainError, ForumRepository, NewComment,
    NewPost, PhotoList, PostChanges, PostId, Principal,
};
use tracing::{info, instrument};

/// Images a single post may carry on creation.
pub const MAX_POST_IMAGES: usize = 4;

/// Checks a post's text before any image is stored.
pub fn check_post_fields(title: &str, content: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(DomainError::Validation(
            "title and content cannot be empty".into(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct CreatePost {
    pub category_id: Option<CategoryId>,
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    pub title: String,
    pub content: String,
    /// Image path appended to the post's existing images.
    pub image: Option<String>,
}

#[derive(Clone)]
pub struct ForumService {
    forum: Arc<dyn ForumRepository>,
}

impl ForumService {
    pub fn new(forum: Arc<dyn ForumRepository>) -> Self {
        Self { forum }
    }

    #[instrument(skip_all, fields(author = %principal.user_id))]
    pub async fn create_post(
        &self,
        principal: &Principal,
        input: CreatePost,
    ) -> Result<PostId, DomainError> {
        check_post_fields(&input.title, &input.content)?;
        let category_id = input
            .category_id
            .ok_or_else(|| DomainError::Validation("categoryId is required".into()))?;
        if input.images.len() > MAX_POST_IMAGES {
            return Err(DomainError::Validation(format!(
                "at most {MAX_POST_IMAGES} images per post"
            )));
        }

        let id = self
            .forum
            .create_post(NewPost {
                author_id: principal.user_id,
                category_id,
                title: input.title,
                content: input.content,
                images: PhotoList::new(input.images),
            })
            .await?;
        info!(post_id = %id, "post created");
        Ok(id)
    }

    /// The post must exist; commenting is open to every member.
    #[instrument(skip_all, fields(post_id = %post_id, commenter = %principal.user_id))]
    pub async fn create_comment(
        &self,
        principal: &Principal,
        post_id: PostId,
        content: String,
    ) -> Result<CommentId, DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::Validation("comment content is required".into()));
        }
        if self.forum.find_post(post_id).await?.is_none() {
            return Err(DomainError::not_found("post", post_id));
        }

        let id = self
            .forum
            .create_comment(NewComment {
                post_id,
                commenter_id: principal.user_id,
                content,
            })
            .await?;
        info!(comment_id = %id, "comment added");
        Ok(id)
    }

    #[instrument(skip_all, fields(post_id = %id, requester = %principal.user_id))]
    pub async fn update_post(
        &self,
        principal: &Principal,
        id: PostId,
        update: PostUpdate,
    ) -> Result<(), DomainError> {
        check_post_fields(&update.title, &update.content)?;

        let post = self
            .forum
            .find_post(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))?;
        ensure_owner_or_admin(post.author_id, principal, "post")?;

        self.forum
            .update_post(
                id,
                PostChanges {
                    title: update.title,
                    content: update.content,
                    images: post.images.merged_with(update.image),
                },
            )
            .await?;
        info!("post updated");
        Ok(())
    }

    #[instrument(skip_all, fields(post_id = %id, requester = %principal.user_id))]
    pub async fn delete_post(&self, principal: &Principal, id: PostId) -> Result<(), DomainError> {
        let post = self
            .forum
            .find_post(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))?;
        ensure_owner_or_admin(post.author_id, principal, "post")?;

        if !self.forum.delete_post(id).await? {
            return Err(DomainError::not_found("post", id));
        }
        info!("post deleted");
        Ok(())
    }

    #[instrument(skip_all, fields(comment_id = %id, requester = %principal.user_id))]
    pub async fn update_comment(
        &self,
        principal: &Principal,
        id: CommentId,
        content: String,
    ) -> Result<(), DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::Validation("comment content is required".into()));
        }

        let comment = self
            .forum
            .find_comment(id)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", id))?;
        ensure_owner_or_admin(comment.commenter_id, principal, "comment")?;

        self.forum.update_comment(id, content).await?;
        info!("comment updated");
        Ok(())
    }

    #[instrument(skip_all, fields(comment_id = %id, requester = %principal.user_id))]
    pub async fn delete_comment(
        &self,
        principal: &Principal,
        id: CommentId,
    ) -> Result<(), DomainError> {
        let comment = self
            .forum
            .find_comment(id)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", id))?;
        ensure_owner_or_admin(comment.commenter_id, principal, "comment")?;

        if !self.forum.delete_comment(id).await? {
            return Err(DomainError::not_found("comment", id));
        }
        info!("comment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::{Comment, MockForumRepository, Post, Role, UserId};

    fn post(author: i64) -> Post {
        Post {
            id: PostId(8),
            author_id: UserId(author),
            category_id: CategoryId(1),
            title: "Vaccination schedule for kittens?".into(),
            content: "Our shelter kitten is 8 weeks old.".into(),
            images: PhotoList::new(vec!["/uploads/kitten.jpg".into()]),
            post_date: Utc::now(),
        }
    }

    fn comment(commenter: i64) -> Comment {
        Comment {
            id: CommentId(4),
            post_id: PostId(8),
            commenter_id: UserId(commenter),
            content: "Ask your vet about the 9-week shot.".into(),
            comment_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn author_update_keeps_images_and_appends_new_one() {
        let mut repo = MockForumRepository::new();
        repo.expect_find_post().returning(|_| Ok(Some(post(3))));
        repo.expect_update_post()
            .withf(|_, changes| {
                changes.images.as_slice() == ["/uploads/kitten.jpg", "/uploads/vet-card.png"]
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let svc = ForumService::new(Arc::new(repo));
        svc.update_post(
            &Principal::new(UserId(3), Role::Member),
            PostId(8),
            PostUpdate {
                title: "Kitten vaccinations".into(),
                content: "Updated with the vet's card.".into(),
                image: Some("/uploads/vet-card.png".into()),
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn stranger_cannot_update_post() {
        let mut repo = MockForumRepository::new();
        repo.expect_find_post().returning(|_| Ok(Some(post(3))));
        repo.expect_update_post().never();

        let err = ForumService::new(Arc::new(repo))
            .update_post(
                &Principal::new(UserId(4), Role::Member),
                PostId(8),
                PostUpdate {
                    title: "t".into(),
                    content: "c".into(),
                    image: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn empty_title_is_rejected_before_lookup() {
        let mut repo = MockForumRepository::new();
        repo.expect_find_post().never();

        let err = ForumService::new(Arc::new(repo))
            .update_post(
                &Principal::new(UserId(3), Role::Member),
                PostId(8),
                PostUpdate {
                    title: "  ".into(),
                    content: "c".into(),
                    image: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn admin_may_edit_any_comment() {
        let mut repo = MockForumRepository::new();
        repo.expect_find_comment().returning(|_| Ok(Some(comment(3))));
        repo.expect_update_comment()
            .withf(|id, content| *id == CommentId(4) && content == "Edited by moderator")
            .times(1)
            .returning(|_, _| Ok(()));

        ForumService::new(Arc::new(repo))
            .update_comment(
                &Principal::new(UserId(1), Role::Admin),
                CommentId(4),
                "Edited by moderator".into(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn stranger_cannot_delete_comment() {
        let mut repo = MockForumRepository::new();
        repo.expect_find_comment().returning(|_| Ok(Some(comment(3))));
        repo.expect_delete_comment().never();

        let err = ForumService::new(Arc::new(repo))
            .delete_comment(&Principal::new(UserId(9), Role::Member), CommentId(4))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn post_needs_a_category() {
        let mut repo = MockForumRepository::new();
        repo.expect_create_post().never();

        let err = ForumService::new(Arc::new(repo))
            .create_post(
                &Principal::new(UserId(3), Role::Member),
                CreatePost {
                    title: "Found a puppy".into(),
                    content: "Near the chapel".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::Validation("categoryId is required".into()));
    }

    #[tokio::test]
    async fn post_is_authored_by_the_caller() {
        let mut repo = MockForumRepository::new();
        repo.expect_create_post()
            .withf(|p| {
                p.author_id == UserId(3)
                    && p.category_id == CategoryId(2)
                    && p.images.as_slice() == ["uploads/puppy.jpg"]
            })
            .times(1)
            .returning(|_| Ok(PostId(50)));

        let id = ForumService::new(Arc::new(repo))
            .create_post(
                &Principal::new(UserId(3), Role::Member),
                CreatePost {
                    category_id: Some(CategoryId(2)),
                    title: "Found a puppy".into(),
                    content: "Near the chapel".into(),
                    images: vec!["uploads/puppy.jpg".into()],
                },
            )
            .await
            .unwrap();
        assert_eq!(id, PostId(50));
    }

    #[tokio::test]
    async fn comment_on_a_missing_post_is_not_found() {
        let mut repo = MockForumRepository::new();
        repo.expect_find_post().returning(|_| Ok(None));
        repo.expect_create_comment().never();

        let err = ForumService::new(Arc::new(repo))
            .create_comment(
                &Principal::new(UserId(4), Role::Member),
                PostId(404),
                "Following".into(),
            )
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::not_found("post", 404));
    }
}
