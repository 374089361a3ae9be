/// Feed model: a post inside a club
///
/// # Schema
///
/// ```sql
/// CREATE TABLE feeds (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(100) NOT NULL,
///     content TEXT NOT NULL,
///     is_private BOOLEAN NOT NULL DEFAULT FALSE,
///     user_id BIGINT NOT NULL REFERENCES users(id),
///     club_id BIGINT NOT NULL REFERENCES clubs(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
/// ```
///
/// # Visibility
///
/// A private feed is visible only to users holding a live membership in the
/// feed's club; public feeds are visible to anyone.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::Identity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Feed {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub identity: Identity,

    pub title: String,

    pub content: String,

    pub is_private: bool,

    /// Author
    pub user_id: i64,

    pub club_id: i64,
}

impl Feed {
    pub fn id(&self) -> i64 {
        self.identity.id
    }

    /// Applies the visibility rule given whether the viewer is a club member
    pub fn is_visible_to(&self, is_member: bool) -> bool {
        !self.is_private || is_member
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFeed {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: String,

    #[serde(default)]
    pub is_private: bool,
}

/// Partial feed update; only `Some` fields change
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateFeed {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: Option<String>,

    pub is_private: Option<bool>,
}

impl UpdateFeed {
    pub fn apply(self, feed: &mut Feed) {
        if let Some(title) = self.title {
            feed.title = title;
        }
        if let Some(content) = self.content {
            feed.content = content;
        }
        if let Some(is_private) = self.is_private {
            feed.is_private = is_private;
        }
    }
}
