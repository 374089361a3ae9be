/// Comments on feeds
///
/// A comment is reachable only through a feed the requester can see; when the
/// feed is hidden the comment reports `CommentNotFound`.

use tracing::{debug, info, warn};

use super::feed::FeedService;
use super::{ensure_live_user, validate_input};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Comment, CreateComment, UpdateComment};
use crate::repository::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn Store>,
    feeds: FeedService,
}

impl CommentService {
    pub fn new(store: Arc<dyn Store>, feeds: FeedService) -> Self {
        Self { store, feeds }
    }

    pub async fn create_comment(
        &self,
        user_id: i64,
        feed_id: i64,
        input: CreateComment,
    ) -> ServiceResult<i64> {
        validate_input(&input)?;
        ensure_live_user(self.store.as_ref(), user_id).await?;

        self.feeds.find_feed(feed_id, Some(user_id)).await?;

        let comment = self.store.insert_comment(user_id, feed_id, &input).await?;

        info!(comment_id = comment.id(), feed_id, user_id, "Comment created");
        Ok(comment.id())
    }

    pub async fn find_comment(
        &self,
        comment_id: i64,
        requester: Option<i64>,
    ) -> ServiceResult<Comment> {
        debug!(comment_id, ?requester, "Finding comment");

        let comment = self
            .store
            .find_comment(comment_id)
            .await?
            .ok_or(ServiceError::CommentNotFound)?;

        match self.feeds.find_feed(comment.feed_id, requester).await {
            Ok(_) => Ok(comment),
            Err(ServiceError::FeedNotFound) => Err(ServiceError::CommentNotFound),
            Err(err) => Err(err),
        }
    }

    /// Comments of a visible feed, oldest first
    pub async fn list_comments_by_feed(
        &self,
        feed_id: i64,
        requester: Option<i64>,
    ) -> ServiceResult<Vec<Comment>> {
        self.feeds.find_feed(feed_id, requester).await?;
        Ok(self.store.list_comments_by_feed(feed_id).await?)
    }

    /// Edits a comment; author only
    pub async fn update_comment(
        &self,
        comment_id: i64,
        user_id: i64,
        changes: UpdateComment,
    ) -> ServiceResult<Comment> {
        validate_input(&changes)?;
        ensure_live_user(self.store.as_ref(), user_id).await?;

        let comment = self.find_comment(comment_id, Some(user_id)).await?;
        ensure_author(&comment, user_id)?;

        let comment = self
            .store
            .update_comment(comment_id, &changes)
            .await?
            .ok_or(ServiceError::CommentNotFound)?;

        info!(comment_id, user_id, "Comment updated");
        Ok(comment)
    }

    /// Soft-deletes a comment; author only
    pub async fn delete_comment(&self, comment_id: i64, user_id: i64) -> ServiceResult<()> {
        ensure_live_user(self.store.as_ref(), user_id).await?;

        let comment = self.find_comment(comment_id, Some(user_id)).await?;
        ensure_author(&comment, user_id)?;

        if !self.store.soft_delete_comment(comment_id).await? {
            return Err(ServiceError::CommentNotFound);
        }

        info!(comment_id, user_id, "Comment deleted");
        Ok(())
    }
}

fn ensure_author(comment: &Comment, user_id: i64) -> ServiceResult<()> {
    if comment.user_id != user_id {
        warn!(comment_id = comment.id(), user_id, "Refused change to another user's comment");
        return Err(ServiceError::bad_request("only the author may change the comment"));
    }
    Ok(())
}
