/// Feed endpoints
///
/// - `GET /clubs/:id/feeds?cursor=&limit=`: newest first; pass the last id
///   of a page as `cursor` to get the next one
/// - `POST /clubs/:id/feeds`
/// - `GET|PUT|DELETE /feeds/:id`
///
/// Private feeds only show up for club members; for anyone else they do
/// not exist.

use axum::{extract::State, http::StatusCode};
use clubhouse_shared::models::{CreateFeed, Feed, UpdateFeed};
use serde::Deserialize;

use super::{created, ok, Envelope, IdPayload};
use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiPath, ApiQuery, AuthUser, ValidatedJson},
};

#[derive(Debug, Default, Deserialize)]
pub struct FeedPageQuery {
    pub cursor: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn list_feeds(
    State(state): State<AppState>,
    requester: Option<AuthUser>,
    ApiPath(club_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<FeedPageQuery>,
) -> ApiResult<Envelope<Vec<Feed>>> {
    let limit = query.limit.unwrap_or(state.config.feeds.page_limit);
    let feeds = state
        .services
        .feeds
        .list_feeds_by_club(club_id, requester.map(|u| u.0), query.cursor, limit)
        .await?;
    Ok(ok(feeds, "Loaded club feeds."))
}

pub async fn create_feed(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(club_id): ApiPath<i64>,
    ValidatedJson(input): ValidatedJson<CreateFeed>,
) -> ApiResult<(StatusCode, Envelope<IdPayload>)> {
    let feed_id = state
        .services
        .feeds
        .create_feed(user_id, club_id, input)
        .await?;
    Ok(created(feed_id, "Feed posted."))
}

pub async fn get_feed(
    State(state): State<AppState>,
    requester: Option<AuthUser>,
    ApiPath(feed_id): ApiPath<i64>,
) -> ApiResult<Envelope<Feed>> {
    let feed = state
        .services
        .feeds
        .find_feed(feed_id, requester.map(|u| u.0))
        .await?;
    Ok(ok(feed, "Loaded the feed."))
}

pub async fn update_feed(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(feed_id): ApiPath<i64>,
    ValidatedJson(changes): ValidatedJson<UpdateFeed>,
) -> ApiResult<Envelope<Feed>> {
    let feed = state
        .services
        .feeds
        .update_feed(feed_id, user_id, changes)
        .await?;
    Ok(ok(feed, "Feed updated."))
}

pub async fn delete_feed(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(feed_id): ApiPath<i64>,
) -> ApiResult<Envelope<IdPayload>> {
    state.services.feeds.delete_feed(feed_id, user_id).await?;
    Ok(ok(IdPayload { id: feed_id }, "Feed deleted."))
}
