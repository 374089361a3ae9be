/// Club model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE clubs (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(50) NOT NULL,
///     description TEXT NOT NULL,
///     capacity INTEGER NOT NULL,
///     sex BOOLEAN NOT NULL,
///     minimum_age INTEGER NOT NULL,
///     maximum_age INTEGER NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
/// CREATE UNIQUE INDEX clubs_name_active_key ON clubs (name) WHERE deleted_at IS NULL;
/// ```
///
/// Names are compared case-sensitively and only against live clubs, so a name
/// frees up once its club is soft-deleted.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::Identity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Club {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub identity: Identity,

    pub name: String,

    pub description: String,

    /// Maximum number of members
    pub capacity: i32,

    /// Target sex of the club
    pub sex: bool,

    pub minimum_age: i32,

    pub maximum_age: i32,
}

impl Club {
    pub fn id(&self) -> i64 {
        self.identity.id
    }
}

/// Input for creating a club
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateClub {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: String,

    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: i32,

    pub sex: bool,

    #[validate(range(min = 0, max = 150, message = "Minimum age must be 0-150"))]
    pub minimum_age: i32,

    #[validate(range(min = 0, max = 150, message = "Maximum age must be 0-150"))]
    pub maximum_age: i32,
}

/// Partial club update; only `Some` fields change
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateClub {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,

    pub sex: Option<bool>,

    #[validate(range(min = 0, max = 150, message = "Minimum age must be 0-150"))]
    pub minimum_age: Option<i32>,

    #[validate(range(min = 0, max = 150, message = "Maximum age must be 0-150"))]
    pub maximum_age: Option<i32>,
}

impl UpdateClub {
    /// Applies the update on top of an existing club
    pub fn apply(self, club: &mut Club) {
        if let Some(name) = self.name {
            club.name = name;
        }
        if let Some(description) = self.description {
            club.description = description;
        }
        if let Some(capacity) = self.capacity {
            club.capacity = capacity;
        }
        if let Some(sex) = self.sex {
            club.sex = sex;
        }
        if let Some(minimum_age) = self.minimum_age {
            club.minimum_age = minimum_age;
        }
        if let Some(maximum_age) = self.maximum_age {
            club.maximum_age = maximum_age;
        }
    }
}
