/// User model
///
/// Users own memberships, feeds and comments. The stored `password` is an
/// Argon2id PHC hash and never leaves the services: every code path that
/// returns a user hands out a [`UserDto`], which has no credential field.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     password VARCHAR(255) NOT NULL,
///     social_id VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL,
///     name VARCHAR(100) NOT NULL,
///     sex BOOLEAN NOT NULL,
///     phone VARCHAR(32) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
/// CREATE UNIQUE INDEX users_email_active_key ON users (email) WHERE deleted_at IS NULL;
/// CREATE UNIQUE INDEX users_social_id_active_key ON users (social_id) WHERE deleted_at IS NULL;
/// ```

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::Identity;

/// Stored user record, including the credential hash
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    #[sqlx(flatten)]
    pub identity: Identity,

    /// Argon2id hash of the user's password
    pub password: String,

    /// External social login identifier
    pub social_id: String,

    pub email: String,

    pub name: String,

    /// Sex flag (true = male)
    pub sex: bool,

    pub phone: String,
}

impl User {
    pub fn id(&self) -> i64 {
        self.identity.id
    }
}

/// Public projection of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    #[serde(flatten)]
    pub identity: Identity,

    pub social_id: String,

    pub email: String,

    pub name: String,

    pub sex: bool,

    pub phone: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        let User {
            identity,
            password: _,
            social_id,
            email,
            name,
            sex,
            phone,
        } = user;

        Self {
            identity,
            social_id,
            email,
            name,
            sex,
            phone,
        }
    }
}

/// Input for registering a user
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    /// Plaintext password; hashed before it reaches storage
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 255, message = "Social id must be 1-255 characters"))]
    pub social_id: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    pub sex: bool,

    #[validate(length(min = 1, max = 32, message = "Phone must be 1-32 characters"))]
    pub phone: String,
}

/// Row handed to the repository once the password is hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub password_hash: String,
    pub social_id: String,
    pub email: String,
    pub name: String,
    pub sex: bool,
    pub phone: String,
}

/// Partial user update; only `Some` fields change
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    pub sex: Option<bool>,

    #[validate(length(min = 1, max = 32, message = "Phone must be 1-32 characters"))]
    pub phone: Option<String>,
}
