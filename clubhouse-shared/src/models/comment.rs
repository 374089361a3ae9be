/// Comment model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id BIGSERIAL PRIMARY KEY,
///     content TEXT NOT NULL,
///     user_id BIGINT NOT NULL REFERENCES users(id),
///     feed_id BIGINT NOT NULL REFERENCES feeds(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
/// ```
///
/// Comments reference their feed; they are never copied or cascaded. Once the
/// feed is gone, its comments are unreachable.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::Identity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub identity: Identity,

    pub content: String,

    pub user_id: i64,

    pub feed_id: i64,
}

impl Comment {
    pub fn id(&self) -> i64 {
        self.identity.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateComment {
    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateComment {
    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,
}
