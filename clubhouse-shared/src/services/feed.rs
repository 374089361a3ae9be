/// Feed lifecycle and visibility
///
/// A feed is visible when it is live, its club is live, and it is either
/// public or the requester holds a membership in the club. Anything else is
/// reported as `FeedNotFound`, whether or not the feed exists.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{ensure_live_user, validate_input};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{CreateFeed, Feed, UpdateFeed};
use crate::repository::{FeedQuery, Store};

/// Largest page `list_feeds_by_club` serves
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct FeedService {
    store: Arc<dyn Store>,
}

impl FeedService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Posts a feed in a club the user belongs to
    pub async fn create_feed(
        &self,
        user_id: i64,
        club_id: i64,
        input: CreateFeed,
    ) -> ServiceResult<i64> {
        validate_input(&input)?;
        ensure_live_user(self.store.as_ref(), user_id).await?;

        if self.store.find_club(club_id).await?.is_none() {
            return Err(ServiceError::ClubNotFound);
        }

        if !self.is_member(Some(user_id), club_id).await? {
            warn!(user_id, club_id, "Feed refused: not a member");
            return Err(ServiceError::bad_request("user is not a member of the club"));
        }

        let feed = self.store.insert_feed(user_id, club_id, &input).await?;

        info!(feed_id = feed.id(), user_id, club_id, private = feed.is_private, "Feed created");
        Ok(feed.id())
    }

    pub async fn find_feed(&self, feed_id: i64, requester: Option<i64>) -> ServiceResult<Feed> {
        debug!(feed_id, ?requester, "Finding feed");

        let feed = self
            .store
            .find_feed(feed_id)
            .await?
            .ok_or(ServiceError::FeedNotFound)?;

        if self.store.find_club(feed.club_id).await?.is_none() {
            return Err(ServiceError::FeedNotFound);
        }

        let is_member = feed.is_private && self.is_member(requester, feed.club_id).await?;
        if !feed.is_visible_to(is_member) {
            return Err(ServiceError::FeedNotFound);
        }

        Ok(feed)
    }

    /// One page of a club's feeds, newest first
    ///
    /// `cursor` is the last feed id of the previous page; only older feeds are
    /// returned. Private feeds are dropped for non-members before the page is
    /// cut, so a page is never short because of them.
    pub async fn list_feeds_by_club(
        &self,
        club_id: i64,
        requester: Option<i64>,
        cursor: Option<i64>,
        limit: i64,
    ) -> ServiceResult<Vec<Feed>> {
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(ServiceError::bad_request(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            )));
        }

        if self.store.find_club(club_id).await?.is_none() {
            return Err(ServiceError::ClubNotFound);
        }

        let query = FeedQuery {
            cursor,
            limit,
            include_private: self.is_member(requester, club_id).await?,
        };

        let feeds = self.store.list_feeds_by_club(club_id, query).await?;
        debug!(club_id, ?cursor, limit, count = feeds.len(), "Listed feeds");
        Ok(feeds)
    }

    /// Edits a feed; author only
    pub async fn update_feed(
        &self,
        feed_id: i64,
        user_id: i64,
        changes: UpdateFeed,
    ) -> ServiceResult<Feed> {
        validate_input(&changes)?;
        ensure_live_user(self.store.as_ref(), user_id).await?;

        let feed = self.find_feed(feed_id, Some(user_id)).await?;
        ensure_author(&feed, user_id)?;

        let feed = self
            .store
            .update_feed(feed_id, changes)
            .await?
            .ok_or(ServiceError::FeedNotFound)?;

        info!(feed_id, user_id, "Feed updated");
        Ok(feed)
    }

    /// Soft-deletes a feed; author only
    pub async fn delete_feed(&self, feed_id: i64, user_id: i64) -> ServiceResult<()> {
        ensure_live_user(self.store.as_ref(), user_id).await?;

        let feed = self.find_feed(feed_id, Some(user_id)).await?;
        ensure_author(&feed, user_id)?;

        if !self.store.soft_delete_feed(feed_id).await? {
            return Err(ServiceError::FeedNotFound);
        }

        info!(feed_id, user_id, "Feed deleted");
        Ok(())
    }

    /// A deleted user's memberships no longer count
    async fn is_member(&self, requester: Option<i64>, club_id: i64) -> ServiceResult<bool> {
        let Some(user_id) = requester else {
            return Ok(false);
        };

        if self.store.find_user(user_id).await?.is_none() {
            return Ok(false);
        }

        Ok(self.store.find_membership(user_id, club_id).await?.is_some())
    }
}

fn ensure_author(feed: &Feed, user_id: i64) -> ServiceResult<()> {
    if feed.user_id != user_id {
        warn!(feed_id = feed.id(), user_id, "Refused change to another user's feed");
        return Err(ServiceError::bad_request("only the author may change the feed"));
    }
    Ok(())
}
