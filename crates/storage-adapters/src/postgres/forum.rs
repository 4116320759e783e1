use async_trait::async_trait;
use domains::{
    CategoryId, Comment, CommentId, DomainError, ForumRepository, NewComment, NewPost, Post,
    PostChanges, PostId, UserId,
};
use sqlx::postgres::PgRow;
use sqlx::Row;

use super::{decode_photos, storage, PgStore};

fn post_from_row(row: &PgRow) -> Result<Post, sqlx::Error> {
    let id: i64 = row.try_get("post_id")?;
    Ok(Post {
        id: PostId(id),
        author_id: UserId(row.try_get("author_id")?),
        category_id: CategoryId(row.try_get("category_id")?),
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        images: decode_photos(row.try_get("images")?, "post", id),
        post_date: row.try_get("post_date")?,
    })
}

fn comment_from_row(row: &PgRow) -> Result<Comment, sqlx::Error> {
    Ok(Comment {
        id: CommentId(row.try_get("comment_id")?),
        post_id: PostId(row.try_get("post_id")?),
        commenter_id: UserId(row.try_get("commenter_id")?),
        content: row.try_get("content")?,
        comment_date: row.try_get("comment_date")?,
    })
}

#[async_trait]
impl ForumRepository for PgStore {
    async fn create_post(&self, post: NewPost) -> Result<PostId, DomainError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO forum_posts (author_id, category_id, title, content, images)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING post_id",
        )
        .bind(post.author_id.0)
        .bind(post.category_id.0)
        .bind(post.title)
        .bind(post.content)
        .bind(post.images.to_json())
        .fetch_one(self.pool())
        .await
        .map_err(storage)?;
        Ok(PostId(id))
    }

    async fn find_post(&self, id: PostId) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query(
            "SELECT post_id, author_id, category_id, title, content, images, post_date
             FROM forum_posts WHERE post_id = $1",
        )
        .bind(id.0)
        .fetch_optional(self.pool())
        .await
        .map_err(storage)?;

        row.as_ref().map(post_from_row).transpose().map_err(storage)
    }

    async fn update_post(&self, id: PostId, changes: PostChanges) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE forum_posts SET title = $1, content = $2, images = $3 WHERE post_id = $4",
        )
        .bind(changes.title)
        .bind(changes.content)
        .bind(changes.images.to_json())
        .bind(id.0)
        .execute(self.pool())
        .await
        .map_err(storage)?;
        Ok(())
    }

    /// Comments go with the post through the foreign key cascade.
    async fn delete_post(&self, id: PostId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM forum_posts WHERE post_id = $1")
            .bind(id.0)
            .execute(self.pool())
            .await
            .map_err(storage)?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_comment(&self, comment: NewComment) -> Result<CommentId, DomainError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO forum_comments (post_id, commenter_id, content)
             VALUES ($1, $2, $3)
             RETURNING comment_id",
        )
        .bind(comment.post_id.0)
        .bind(comment.commenter_id.0)
        .bind(comment.content)
        .fetch_one(self.pool())
        .await
        .map_err(storage)?;
        Ok(CommentId(id))
    }

    async fn find_comment(&self, id: CommentId) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query(
            "SELECT comment_id, post_id, commenter_id, content, comment_date
             FROM forum_comments WHERE comment_id = $1",
        )
        .bind(id.0)
        .fetch_optional(self.pool())
        .await
        .map_err(storage)?;

        row.as_ref()
            .map(comment_from_row)
            .transpose()
            .map_err(storage)
    }

    async fn update_comment(&self, id: CommentId, content: String) -> Result<(), DomainError> {
        sqlx::query("UPDATE forum_comments SET content = $1 WHERE comment_id = $2")
            .bind(content)
            .bind(id.0)
            .execute(self.pool())
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn delete_comment(&self, id: CommentId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM forum_comments WHERE comment_id = $1")
            .bind(id.0)
            .execute(self.pool())
            .await
            .map_err(storage)?;
        Ok(result.rows_affected() > 0)
    }
}
