use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(pub i64);

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    self.0.fmt(f)
                }
            }

            impl From<i64> for $name {
                fn from(raw: i64) -> Self {
                    Self(raw)
                }
            }
        )+
    };
}

id_type!(
    /// Primary key of `users`.
    UserId,
    /// Primary key of `pets`.
    PetId,
    /// Primary key of `applications`.
    ApplicationId,
    /// Primary key of `lost_found_reports`.
    ReportId,
    /// Primary key of `forum_posts`.
    PostId,
    /// Primary key of `forum_comments`.
    CommentId,
    CategoryId,
);
