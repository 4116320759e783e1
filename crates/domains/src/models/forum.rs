use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CategoryId, CommentId, PhotoList, PostId, UserId};

/// A discussion thread opener in the forum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub category_id: CategoryId,
    pub title: String,
    pub content: String,
    pub images: PhotoList,
    pub post_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author_id: UserId,
    pub category_id: CategoryId,
    pub title: String,
    pub content: String,
    pub images: PhotoList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    pub title: String,
    pub content: String,
    pub images: PhotoList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub commenter_id: UserId,
    pub content: String,
    pub comment_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post_id: PostId,
    pub commenter_id: UserId,
    pub content: String,
}
