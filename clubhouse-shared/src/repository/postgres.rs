/// PostgreSQL persistence adapter
///
/// Implements the repository ports with sqlx. Uniqueness invariants are not
/// checked here: the partial unique indexes created by the migrations reject
/// the losing writer, and the resulting database error is converted into
/// [`StoreError::UniqueViolation`](super::StoreError::UniqueViolation).
///
/// # Example
///
/// ```no_run
/// use clubhouse_shared::db::pool::{create_pool, DatabaseConfig};
/// use clubhouse_shared::repository::{ClubRepository, PgStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(&DatabaseConfig::new("postgresql://localhost/clubhouse")).await?;
/// let store = PgStore::new(pool);
/// let clubs = store.list_clubs().await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{
    ClubRepository, CommentRepository, FeedQuery, FeedRepository, MembershipRepository,
    StoreResult, UserRepository,
};
use crate::models::{
    Club, Comment, CreateClub, CreateComment, CreateFeed, Feed, Identity, Membership, NewUser,
    Role, UpdateClub, UpdateComment, UpdateFeed, UpdateUser, User,
};

/// sqlx-backed store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Row of the members listing (membership joined with its user)
#[derive(sqlx::FromRow)]
struct MemberRow {
    membership_id: i64,
    membership_created_at: DateTime<Utc>,
    membership_updated_at: DateTime<Utc>,
    club_id: i64,
    role: Role,
    exp: i64,
    #[sqlx(flatten)]
    user: User,
}

impl From<MemberRow> for (Membership, User) {
    fn from(row: MemberRow) -> Self {
        let membership = Membership {
            identity: Identity {
                id: row.membership_id,
                created_at: row.membership_created_at,
                updated_at: row.membership_updated_at,
                deleted_at: None,
            },
            user_id: row.user.identity.id,
            club_id: row.club_id,
            role: row.role,
            exp: row.exp,
        };
        (membership, row.user)
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (password, social_id, email, name, sex, phone)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, created_at, updated_at, deleted_at,
                      password, social_id, email, name, sex, phone
            "#,
        )
        .bind(user.password_hash)
        .bind(user.social_id)
        .bind(user.email)
        .bind(user.name)
        .bind(user.sex)
        .bind(user.phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, created_at, updated_at, deleted_at,
                   password, social_id, email, name, sex, phone
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, created_at, updated_at, deleted_at,
                   password, social_id, email, name, sex, phone
            FROM users
            WHERE email = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, created_at, updated_at, deleted_at,
                   password, social_id, email, name, sex, phone
            FROM users
            WHERE deleted_at IS NULL
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn update_user(&self, id: i64, changes: UpdateUser) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET password = COALESCE($2, password),
                email = COALESCE($3, email),
                name = COALESCE($4, name),
                sex = COALESCE($5, sex),
                phone = COALESCE($6, phone),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, created_at, updated_at, deleted_at,
                      password, social_id, email, name, sex, phone
            "#,
        )
        .bind(id)
        .bind(changes.password)
        .bind(changes.email)
        .bind(changes.name)
        .bind(changes.sex)
        .bind(changes.phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn soft_delete_user(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ClubRepository for PgStore {
    async fn insert_club(&self, club: &CreateClub) -> StoreResult<Club> {
        let club = sqlx::query_as::<_, Club>(
            r#"
            INSERT INTO clubs (name, description, capacity, sex, minimum_age, maximum_age)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, created_at, updated_at, deleted_at,
                      name, description, capacity, sex, minimum_age, maximum_age
            "#,
        )
        .bind(&club.name)
        .bind(&club.description)
        .bind(club.capacity)
        .bind(club.sex)
        .bind(club.minimum_age)
        .bind(club.maximum_age)
        .fetch_one(&self.pool)
        .await?;

        Ok(club)
    }

    async fn find_club(&self, id: i64) -> StoreResult<Option<Club>> {
        let club = sqlx::query_as::<_, Club>(
            r#"
            SELECT id, created_at, updated_at, deleted_at,
                   name, description, capacity, sex, minimum_age, maximum_age
            FROM clubs
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(club)
    }

    async fn find_club_by_name(&self, name: &str) -> StoreResult<Option<Club>> {
        let club = sqlx::query_as::<_, Club>(
            r#"
            SELECT id, created_at, updated_at, deleted_at,
                   name, description, capacity, sex, minimum_age, maximum_age
            FROM clubs
            WHERE name = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(club)
    }

    async fn list_clubs(&self) -> StoreResult<Vec<Club>> {
        let clubs = sqlx::query_as::<_, Club>(
            r#"
            SELECT id, created_at, updated_at, deleted_at,
                   name, description, capacity, sex, minimum_age, maximum_age
            FROM clubs
            WHERE deleted_at IS NULL
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clubs)
    }

    async fn update_club(&self, id: i64, changes: UpdateClub) -> StoreResult<Option<Club>> {
        let club = sqlx::query_as::<_, Club>(
            r#"
            UPDATE clubs
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                capacity = COALESCE($4, capacity),
                sex = COALESCE($5, sex),
                minimum_age = COALESCE($6, minimum_age),
                maximum_age = COALESCE($7, maximum_age),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, created_at, updated_at, deleted_at,
                      name, description, capacity, sex, minimum_age, maximum_age
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.capacity)
        .bind(changes.sex)
        .bind(changes.minimum_age)
        .bind(changes.maximum_age)
        .fetch_optional(&self.pool)
        .await?;

        Ok(club)
    }

    async fn soft_delete_club(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE clubs SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl MembershipRepository for PgStore {
    async fn insert_membership(
        &self,
        user_id: i64,
        club_id: i64,
        role: Role,
    ) -> StoreResult<Membership> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (user_id, club_id, role)
            VALUES ($1, $2, $3)
            RETURNING id, created_at, updated_at, deleted_at, user_id, club_id, role, exp
            "#,
        )
        .bind(user_id)
        .bind(club_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(membership)
    }

    async fn find_membership(
        &self,
        user_id: i64,
        club_id: i64,
    ) -> StoreResult<Option<Membership>> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, created_at, updated_at, deleted_at, user_id, club_id, role, exp
            FROM memberships
            WHERE user_id = $1 AND club_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(user_id)
        .bind(club_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(membership)
    }

    async fn list_members(
        &self,
        club_id: i64,
        role: Option<Role>,
    ) -> StoreResult<Vec<(Membership, User)>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT m.id AS membership_id,
                   m.created_at AS membership_created_at,
                   m.updated_at AS membership_updated_at,
                   m.club_id, m.role, m.exp,
                   u.id, u.created_at, u.updated_at, u.deleted_at,
                   u.password, u.social_id, u.email, u.name, u.sex, u.phone
            FROM memberships m
            JOIN users u ON u.id = m.user_id AND u.deleted_at IS NULL
            WHERE m.club_id = $1 AND m.deleted_at IS NULL
              AND ($2::club_role IS NULL OR m.role = $2)
            ORDER BY m.id ASC
            "#,
        )
        .bind(club_id)
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_memberships_of_user(&self, user_id: i64) -> StoreResult<Vec<Membership>> {
        let memberships = sqlx::query_as::<_, Membership>(
            r#"
            SELECT m.id, m.created_at, m.updated_at, m.deleted_at,
                   m.user_id, m.club_id, m.role, m.exp
            FROM memberships m
            JOIN clubs c ON c.id = m.club_id AND c.deleted_at IS NULL
            WHERE m.user_id = $1 AND m.deleted_at IS NULL
            ORDER BY m.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(memberships)
    }

    async fn update_role(
        &self,
        membership_id: i64,
        role: Role,
    ) -> StoreResult<Option<Membership>> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            UPDATE memberships
            SET role = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, created_at, updated_at, deleted_at, user_id, club_id, role, exp
            "#,
        )
        .bind(membership_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(membership)
    }

    async fn add_exp(&self, membership_id: i64, amount: i64) -> StoreResult<Option<Membership>> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            UPDATE memberships
            SET exp = exp + $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, created_at, updated_at, deleted_at, user_id, club_id, role, exp
            "#,
        )
        .bind(membership_id)
        .bind(amount.max(0))
        .fetch_optional(&self.pool)
        .await?;

        Ok(membership)
    }

    async fn soft_delete_membership(&self, membership_id: i64) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE memberships SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(membership_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl FeedRepository for PgStore {
    async fn insert_feed(
        &self,
        user_id: i64,
        club_id: i64,
        feed: &CreateFeed,
    ) -> StoreResult<Feed> {
        let feed = sqlx::query_as::<_, Feed>(
            r#"
            INSERT INTO feeds (title, content, is_private, user_id, club_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_at, updated_at, deleted_at,
                      title, content, is_private, user_id, club_id
            "#,
        )
        .bind(&feed.title)
        .bind(&feed.content)
        .bind(feed.is_private)
        .bind(user_id)
        .bind(club_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(feed)
    }

    async fn find_feed(&self, id: i64) -> StoreResult<Option<Feed>> {
        let feed = sqlx::query_as::<_, Feed>(
            r#"
            SELECT id, created_at, updated_at, deleted_at,
                   title, content, is_private, user_id, club_id
            FROM feeds
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(feed)
    }

    async fn list_feeds_by_club(&self, club_id: i64, query: FeedQuery) -> StoreResult<Vec<Feed>> {
        // Ids grow in creation order, so id order is creation order
        let feeds = sqlx::query_as::<_, Feed>(
            r#"
            SELECT id, created_at, updated_at, deleted_at,
                   title, content, is_private, user_id, club_id
            FROM feeds
            WHERE club_id = $1
              AND deleted_at IS NULL
              AND ($2::BIGINT IS NULL OR id < $2)
              AND ($3 OR NOT is_private)
            ORDER BY id DESC
            LIMIT $4
            "#,
        )
        .bind(club_id)
        .bind(query.cursor)
        .bind(query.include_private)
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(feeds)
    }

    async fn update_feed(&self, id: i64, changes: UpdateFeed) -> StoreResult<Option<Feed>> {
        let feed = sqlx::query_as::<_, Feed>(
            r#"
            UPDATE feeds
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                is_private = COALESCE($4, is_private),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, created_at, updated_at, deleted_at,
                      title, content, is_private, user_id, club_id
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.content)
        .bind(changes.is_private)
        .fetch_optional(&self.pool)
        .await?;

        Ok(feed)
    }

    async fn soft_delete_feed(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE feeds SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CommentRepository for PgStore {
    async fn insert_comment(
        &self,
        user_id: i64,
        feed_id: i64,
        comment: &CreateComment,
    ) -> StoreResult<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (content, user_id, feed_id)
            VALUES ($1, $2, $3)
            RETURNING id, created_at, updated_at, deleted_at, content, user_id, feed_id
            "#,
        )
        .bind(&comment.content)
        .bind(user_id)
        .bind(feed_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn find_comment(&self, id: i64) -> StoreResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, created_at, updated_at, deleted_at, content, user_id, feed_id
            FROM comments
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn list_comments_by_feed(&self, feed_id: i64) -> StoreResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, created_at, updated_at, deleted_at, content, user_id, feed_id
            FROM comments
            WHERE feed_id = $1 AND deleted_at IS NULL
            ORDER BY id ASC
            "#,
        )
        .bind(feed_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn update_comment(
        &self,
        id: i64,
        changes: &UpdateComment,
    ) -> StoreResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET content = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, created_at, updated_at, deleted_at, content, user_id, feed_id
            "#,
        )
        .bind(id)
        .bind(&changes.content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn soft_delete_comment(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE comments SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
