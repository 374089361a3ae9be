/// In-memory persistence adapter
///
/// Keeps every table in one `BTreeMap` per entity behind a single
/// `tokio::sync::Mutex`. Holding the lock for the whole operation makes each
/// check-and-write atomic, so the partial unique indexes of the Postgres schema
/// are reproduced exactly: a losing writer gets the same
/// [`StoreError::UniqueViolation`] it would get from the database.
///
/// # Example
///
/// ```
/// use clubhouse_shared::repository::{ClubRepository, MemoryStore};
/// use clubhouse_shared::models::CreateClub;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let club = store.insert_club(&CreateClub {
///     name: "Hikers".to_string(),
///     description: "weekend hikes".to_string(),
///     capacity: 20,
///     sex: true,
///     minimum_age: 20,
///     maximum_age: 40,
/// }).await?;
/// assert!(store.find_club(club.identity.id).await?.is_some());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use super::{
    constraints, ClubRepository, CommentRepository, FeedQuery, FeedRepository,
    MembershipRepository, StoreError, StoreResult, UserRepository,
};
use crate::models::{
    Club, Comment, CreateClub, CreateComment, CreateFeed, Feed, Identity, Membership, NewUser,
    Role, UpdateClub, UpdateComment, UpdateFeed, UpdateUser, User,
};

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    clubs: BTreeMap<i64, Club>,
    memberships: BTreeMap<i64, Membership>,
    feeds: BTreeMap<i64, Feed>,
    comments: BTreeMap<i64, Comment>,
}

impl Tables {
    /// Ids are shared across tables and strictly increasing
    fn allocate(&mut self) -> Identity {
        self.next_id += 1;
        Identity::new(self.next_id, Utc::now())
    }

    fn live_club(&self, id: i64) -> Option<&Club> {
        self.clubs.get(&id).filter(|club| !club.identity.is_deleted())
    }

    fn club_name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.clubs.values().any(|club| {
            !club.identity.is_deleted() && club.name == name && Some(club.identity.id) != except
        })
    }

    fn user_conflict(
        &self,
        email: Option<&str>,
        social_id: Option<&str>,
        except: Option<i64>,
    ) -> Option<&'static str> {
        let live = self
            .users
            .values()
            .filter(|user| !user.identity.is_deleted() && Some(user.identity.id) != except);

        for user in live {
            if email == Some(user.email.as_str()) {
                return Some(constraints::USER_EMAIL);
            }
            if social_id == Some(user.social_id.as_str()) {
                return Some(constraints::USER_SOCIAL_ID);
            }
        }
        None
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of feed rows, deleted ones included
    pub async fn stored_feed_count(&self) -> usize {
        self.tables.lock().await.feeds.len()
    }
}

fn violation(constraint: &str) -> StoreError {
    StoreError::UniqueViolation(constraint.to_string())
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.lock().await;

        if let Some(constraint) =
            tables.user_conflict(Some(user.email.as_str()), Some(user.social_id.as_str()), None)
        {
            return Err(violation(constraint));
        }

        let record = User {
            identity: tables.allocate(),
            password: user.password_hash,
            social_id: user.social_id,
            email: user.email,
            name: user.name,
            sex: user.sex,
            phone: user.phone,
        };
        tables.users.insert(record.identity.id, record.clone());

        Ok(record)
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .get(&id)
            .filter(|user| !user.identity.is_deleted())
            .cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .values()
            .find(|user| !user.identity.is_deleted() && user.email == email)
            .cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .values()
            .filter(|user| !user.identity.is_deleted())
            .cloned()
            .collect())
    }

    async fn update_user(&self, id: i64, changes: UpdateUser) -> StoreResult<Option<User>> {
        let mut tables = self.tables.lock().await;

        if let Some(constraint) = tables.user_conflict(changes.email.as_deref(), None, Some(id)) {
            return Err(violation(constraint));
        }

        let Some(user) = tables
            .users
            .get_mut(&id)
            .filter(|user| !user.identity.is_deleted())
        else {
            return Ok(None);
        };

        if let Some(password) = changes.password {
            user.password = password;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(sex) = changes.sex {
            user.sex = sex;
        }
        if let Some(phone) = changes.phone {
            user.phone = phone;
        }
        user.identity.touch(Utc::now());

        Ok(Some(user.clone()))
    }

    async fn soft_delete_user(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        match tables.users.get_mut(&id) {
            Some(user) if !user.identity.is_deleted() => {
                user.identity.mark_deleted(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl ClubRepository for MemoryStore {
    async fn insert_club(&self, club: &CreateClub) -> StoreResult<Club> {
        let mut tables = self.tables.lock().await;

        if tables.club_name_taken(&club.name, None) {
            return Err(violation(constraints::CLUB_NAME));
        }

        let record = Club {
            identity: tables.allocate(),
            name: club.name.clone(),
            description: club.description.clone(),
            capacity: club.capacity,
            sex: club.sex,
            minimum_age: club.minimum_age,
            maximum_age: club.maximum_age,
        };
        tables.clubs.insert(record.identity.id, record.clone());

        Ok(record)
    }

    async fn find_club(&self, id: i64) -> StoreResult<Option<Club>> {
        let tables = self.tables.lock().await;
        Ok(tables.live_club(id).cloned())
    }

    async fn find_club_by_name(&self, name: &str) -> StoreResult<Option<Club>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .clubs
            .values()
            .find(|club| !club.identity.is_deleted() && club.name == name)
            .cloned())
    }

    async fn list_clubs(&self) -> StoreResult<Vec<Club>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .clubs
            .values()
            .filter(|club| !club.identity.is_deleted())
            .cloned()
            .collect())
    }

    async fn update_club(&self, id: i64, changes: UpdateClub) -> StoreResult<Option<Club>> {
        let mut tables = self.tables.lock().await;

        if let Some(name) = changes.name.as_deref() {
            if tables.club_name_taken(name, Some(id)) {
                return Err(violation(constraints::CLUB_NAME));
            }
        }

        let Some(club) = tables
            .clubs
            .get_mut(&id)
            .filter(|club| !club.identity.is_deleted())
        else {
            return Ok(None);
        };

        changes.apply(club);
        club.identity.touch(Utc::now());

        Ok(Some(club.clone()))
    }

    async fn soft_delete_club(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        match tables.clubs.get_mut(&id) {
            Some(club) if !club.identity.is_deleted() => {
                club.identity.mark_deleted(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl MembershipRepository for MemoryStore {
    async fn insert_membership(
        &self,
        user_id: i64,
        club_id: i64,
        role: Role,
    ) -> StoreResult<Membership> {
        let mut tables = self.tables.lock().await;

        let duplicate = tables.memberships.values().any(|m| {
            !m.identity.is_deleted() && m.user_id == user_id && m.club_id == club_id
        });
        if duplicate {
            return Err(violation(constraints::MEMBERSHIP_PAIR));
        }

        let record = Membership {
            identity: tables.allocate(),
            user_id,
            club_id,
            role,
            exp: 0,
        };
        tables.memberships.insert(record.identity.id, record.clone());

        Ok(record)
    }

    async fn find_membership(
        &self,
        user_id: i64,
        club_id: i64,
    ) -> StoreResult<Option<Membership>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .memberships
            .values()
            .find(|m| !m.identity.is_deleted() && m.user_id == user_id && m.club_id == club_id)
            .cloned())
    }

    async fn list_members(
        &self,
        club_id: i64,
        role: Option<Role>,
    ) -> StoreResult<Vec<(Membership, User)>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .memberships
            .values()
            .filter(|m| !m.identity.is_deleted() && m.club_id == club_id)
            .filter(|m| role.map_or(true, |role| m.role == role))
            .filter_map(|m| {
                tables
                    .users
                    .get(&m.user_id)
                    .filter(|user| !user.identity.is_deleted())
                    .map(|user| (m.clone(), user.clone()))
            })
            .collect())
    }

    async fn list_memberships_of_user(&self, user_id: i64) -> StoreResult<Vec<Membership>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .memberships
            .values()
            .filter(|m| !m.identity.is_deleted() && m.user_id == user_id)
            .filter(|m| tables.live_club(m.club_id).is_some())
            .cloned()
            .collect())
    }

    async fn update_role(
        &self,
        membership_id: i64,
        role: Role,
    ) -> StoreResult<Option<Membership>> {
        let mut tables = self.tables.lock().await;
        Ok(tables
            .memberships
            .get_mut(&membership_id)
            .filter(|m| !m.identity.is_deleted())
            .map(|m| {
                m.role = role;
                m.identity.touch(Utc::now());
                m.clone()
            }))
    }

    async fn add_exp(&self, membership_id: i64, amount: i64) -> StoreResult<Option<Membership>> {
        let mut tables = self.tables.lock().await;
        Ok(tables
            .memberships
            .get_mut(&membership_id)
            .filter(|m| !m.identity.is_deleted())
            .map(|m| {
                m.exp = m.exp.saturating_add(amount.max(0));
                m.identity.touch(Utc::now());
                m.clone()
            }))
    }

    async fn soft_delete_membership(&self, membership_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        match tables.memberships.get_mut(&membership_id) {
            Some(m) if !m.identity.is_deleted() => {
                m.identity.mark_deleted(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl FeedRepository for MemoryStore {
    async fn insert_feed(
        &self,
        user_id: i64,
        club_id: i64,
        feed: &CreateFeed,
    ) -> StoreResult<Feed> {
        let mut tables = self.tables.lock().await;

        let record = Feed {
            identity: tables.allocate(),
            title: feed.title.clone(),
            content: feed.content.clone(),
            is_private: feed.is_private,
            user_id,
            club_id,
        };
        tables.feeds.insert(record.identity.id, record.clone());

        Ok(record)
    }

    async fn find_feed(&self, id: i64) -> StoreResult<Option<Feed>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .feeds
            .get(&id)
            .filter(|feed| !feed.identity.is_deleted())
            .cloned())
    }

    async fn list_feeds_by_club(&self, club_id: i64, query: FeedQuery) -> StoreResult<Vec<Feed>> {
        let tables = self.tables.lock().await;
        let limit = usize::try_from(query.limit).unwrap_or(0);

        Ok(tables
            .feeds
            .values()
            .rev()
            .filter(|feed| !feed.identity.is_deleted() && feed.club_id == club_id)
            .filter(|feed| query.cursor.map_or(true, |cursor| feed.identity.id < cursor))
            .filter(|feed| query.include_private || !feed.is_private)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn update_feed(&self, id: i64, changes: UpdateFeed) -> StoreResult<Option<Feed>> {
        let mut tables = self.tables.lock().await;
        Ok(tables
            .feeds
            .get_mut(&id)
            .filter(|feed| !feed.identity.is_deleted())
            .map(|feed| {
                changes.apply(feed);
                feed.identity.touch(Utc::now());
                feed.clone()
            }))
    }

    async fn soft_delete_feed(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        match tables.feeds.get_mut(&id) {
            Some(feed) if !feed.identity.is_deleted() => {
                feed.identity.mark_deleted(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn insert_comment(
        &self,
        user_id: i64,
        feed_id: i64,
        comment: &CreateComment,
    ) -> StoreResult<Comment> {
        let mut tables = self.tables.lock().await;

        let record = Comment {
            identity: tables.allocate(),
            content: comment.content.clone(),
            user_id,
            feed_id,
        };
        tables.comments.insert(record.identity.id, record.clone());

        Ok(record)
    }

    async fn find_comment(&self, id: i64) -> StoreResult<Option<Comment>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .comments
            .get(&id)
            .filter(|comment| !comment.identity.is_deleted())
            .cloned())
    }

    async fn list_comments_by_feed(&self, feed_id: i64) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .comments
            .values()
            .filter(|comment| !comment.identity.is_deleted() && comment.feed_id == feed_id)
            .cloned()
            .collect())
    }

    async fn update_comment(
        &self,
        id: i64,
        changes: &UpdateComment,
    ) -> StoreResult<Option<Comment>> {
        let mut tables = self.tables.lock().await;
        Ok(tables
            .comments
            .get_mut(&id)
            .filter(|comment| !comment.identity.is_deleted())
            .map(|comment| {
                comment.content = changes.content.clone();
                comment.identity.touch(Utc::now());
                comment.clone()
            }))
    }

    async fn soft_delete_comment(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        match tables.comments.get_mut(&id) {
            Some(comment) if !comment.identity.is_deleted() => {
                comment.identity.mark_deleted(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
