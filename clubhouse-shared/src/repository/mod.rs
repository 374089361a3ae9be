/// Persistence ports
///
/// Services talk to storage only through the traits in this module. Two
/// adapters implement them:
///
/// - [`postgres::PgStore`]: sqlx against PostgreSQL, invariants enforced by
///   partial unique indexes
/// - [`memory::MemoryStore`]: in-process tables behind a single lock, with the
///   same uniqueness rules (tests and local development)
///
/// Every lookup excludes soft-deleted rows. Write paths that hit a uniqueness
/// invariant fail with [`StoreError::UniqueViolation`] naming the constraint
/// from [`constraints`], which the error registry maps to a conflict entry.

use async_trait::async_trait;

use crate::models::{
    Club, Comment, CreateClub, CreateComment, CreateFeed, Feed, Membership, NewUser, Role,
    UpdateClub, UpdateComment, UpdateFeed, UpdateUser, User,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Names of the storage-level uniqueness constraints
pub mod constraints {
    pub const CLUB_NAME: &str = "clubs_name_active_key";
    pub const MEMBERSHIP_PAIR: &str = "memberships_user_club_active_key";
    pub const USER_EMAIL: &str = "users_email_active_key";
    pub const USER_SOCIAL_ID: &str = "users_social_id_active_key";
}

/// Error type for persistence adapters
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness invariant rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Any other storage failure
    #[error("Storage failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::UniqueViolation(db_err.constraint().unwrap_or_default().to_string())
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Page request for club feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuery {
    /// Last feed id the caller has seen; only older feeds are returned
    pub cursor: Option<i64>,

    /// Maximum number of feeds to return
    pub limit: i64,

    /// Whether private feeds are part of the result
    pub include_private: bool,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Live users, oldest first
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Applies a partial update; `changes.password` must already be hashed
    async fn update_user(&self, id: i64, changes: UpdateUser) -> StoreResult<Option<User>>;

    async fn soft_delete_user(&self, id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait ClubRepository: Send + Sync {
    async fn insert_club(&self, club: &CreateClub) -> StoreResult<Club>;

    async fn find_club(&self, id: i64) -> StoreResult<Option<Club>>;

    /// Exact, case-sensitive match against live clubs
    async fn find_club_by_name(&self, name: &str) -> StoreResult<Option<Club>>;

    /// Live clubs, oldest first
    async fn list_clubs(&self) -> StoreResult<Vec<Club>>;

    async fn update_club(&self, id: i64, changes: UpdateClub) -> StoreResult<Option<Club>>;

    async fn soft_delete_club(&self, id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    async fn insert_membership(
        &self,
        user_id: i64,
        club_id: i64,
        role: Role,
    ) -> StoreResult<Membership>;

    async fn find_membership(
        &self,
        user_id: i64,
        club_id: i64,
    ) -> StoreResult<Option<Membership>>;

    /// Live memberships of a club joined with their live users, in join order;
    /// `role` keeps only members holding that tier
    async fn list_members(
        &self,
        club_id: i64,
        role: Option<Role>,
    ) -> StoreResult<Vec<(Membership, User)>>;

    /// Live memberships of a user in live clubs, in join order
    async fn list_memberships_of_user(&self, user_id: i64) -> StoreResult<Vec<Membership>>;

    async fn update_role(&self, membership_id: i64, role: Role) -> StoreResult<Option<Membership>>;

    /// Adds `amount` (non-negative) to the membership's experience
    async fn add_exp(&self, membership_id: i64, amount: i64) -> StoreResult<Option<Membership>>;

    async fn soft_delete_membership(&self, membership_id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait FeedRepository: Send + Sync {
    async fn insert_feed(&self, user_id: i64, club_id: i64, feed: &CreateFeed) -> StoreResult<Feed>;

    async fn find_feed(&self, id: i64) -> StoreResult<Option<Feed>>;

    /// Live feeds of a club, newest first
    async fn list_feeds_by_club(&self, club_id: i64, query: FeedQuery) -> StoreResult<Vec<Feed>>;

    async fn update_feed(&self, id: i64, changes: UpdateFeed) -> StoreResult<Option<Feed>>;

    async fn soft_delete_feed(&self, id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert_comment(
        &self,
        user_id: i64,
        feed_id: i64,
        comment: &CreateComment,
    ) -> StoreResult<Comment>;

    async fn find_comment(&self, id: i64) -> StoreResult<Option<Comment>>;

    /// Live comments of a feed, oldest first
    async fn list_comments_by_feed(&self, feed_id: i64) -> StoreResult<Vec<Comment>>;

    async fn update_comment(
        &self,
        id: i64,
        changes: &UpdateComment,
    ) -> StoreResult<Option<Comment>>;

    async fn soft_delete_comment(&self, id: i64) -> StoreResult<bool>;
}

/// Everything the services need from storage
pub trait Store:
    UserRepository + ClubRepository + MembershipRepository + FeedRepository + CommentRepository
{
}

impl<T> Store for T where
    T: UserRepository + ClubRepository + MembershipRepository + FeedRepository + CommentRepository
{
}
