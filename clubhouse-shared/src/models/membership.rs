/// Membership model: a user's participation in a club
///
/// # Schema
///
/// ```sql
/// CREATE TYPE club_role AS ENUM ('member', 'admin', 'owner');
///
/// CREATE TABLE memberships (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id),
///     club_id BIGINT NOT NULL REFERENCES clubs(id),
///     role club_role NOT NULL DEFAULT 'member',
///     exp BIGINT NOT NULL DEFAULT 0 CHECK (exp >= 0),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
/// CREATE UNIQUE INDEX memberships_user_club_active_key
///     ON memberships (user_id, club_id) WHERE deleted_at IS NULL;
/// ```
///
/// # Roles
///
/// Tiers are ordered `member < admin < owner`; comparisons use the derived `Ord`.
///
/// - **owner**: full control of the club
/// - **admin**: manages members and club settings
/// - **member**: posts and comments

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::common::Identity;
use super::user::UserDto;

/// Role tier within a club
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "club_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Admin,
    Owner,
}

/// Raised when a role value is outside the defined tiers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 3] = [Role::Member, Role::Admin, Role::Owner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
            Role::Owner => "owner",
        }
    }

    /// Can edit club settings and manage members
    pub fn can_manage_club(&self) -> bool {
        matches!(self, Role::Owner | Role::Admin)
    }

    /// Can delete the club
    pub fn can_delete_club(&self) -> bool {
        matches!(self, Role::Owner)
    }

    /// Checks if this role is at least the required tier
    pub fn has_permission(&self, required: Role) -> bool {
        *self >= required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Membership record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub identity: Identity,

    pub user_id: i64,

    pub club_id: i64,

    pub role: Role,

    /// Experience points; never negative, never decreases
    pub exp: i64,
}

impl Membership {
    pub fn id(&self) -> i64 {
        self.identity.id
    }
}

/// A club member as listed to clients: the user's public projection plus
/// their role and experience in the club
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDto {
    #[serde(flatten)]
    pub user: UserDto,

    pub role: Role,

    pub exp: i64,
}

impl MemberDto {
    pub fn new(membership: &Membership, user: UserDto) -> Self {
        Self {
            user,
            role: membership.role,
            exp: membership.exp,
        }
    }
}
