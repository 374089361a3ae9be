/// Comment endpoints
///
/// - `GET|POST /feeds/:id/comments`
/// - `GET|PUT|DELETE /comments/:id`

use axum::{extract::State, http::StatusCode};
use clubhouse_shared::models::{Comment, CreateComment, UpdateComment};

use super::{created, ok, Envelope, IdPayload};
use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiPath, AuthUser, ValidatedJson},
};

pub async fn list_comments(
    State(state): State<AppState>,
    requester: Option<AuthUser>,
    ApiPath(feed_id): ApiPath<i64>,
) -> ApiResult<Envelope<Vec<Comment>>> {
    let comments = state
        .services
        .comments
        .list_comments_by_feed(feed_id, requester.map(|u| u.0))
        .await?;
    Ok(ok(comments, "Loaded all comments."))
}

pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(feed_id): ApiPath<i64>,
    ValidatedJson(input): ValidatedJson<CreateComment>,
) -> ApiResult<(StatusCode, Envelope<IdPayload>)> {
    let comment_id = state
        .services
        .comments
        .create_comment(user_id, feed_id, input)
        .await?;
    Ok(created(comment_id, "Comment posted."))
}

pub async fn get_comment(
    State(state): State<AppState>,
    requester: Option<AuthUser>,
    ApiPath(comment_id): ApiPath<i64>,
) -> ApiResult<Envelope<Comment>> {
    let comment = state
        .services
        .comments
        .find_comment(comment_id, requester.map(|u| u.0))
        .await?;
    Ok(ok(comment, "Loaded the comment."))
}

pub async fn update_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(comment_id): ApiPath<i64>,
    ValidatedJson(changes): ValidatedJson<UpdateComment>,
) -> ApiResult<Envelope<Comment>> {
    let comment = state
        .services
        .comments
        .update_comment(comment_id, user_id, changes)
        .await?;
    Ok(ok(comment, "Comment updated."))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(comment_id): ApiPath<i64>,
) -> ApiResult<Envelope<IdPayload>> {
    state
        .services
        .comments
        .delete_comment(comment_id, user_id)
        .await?;
    Ok(ok(IdPayload { id: comment_id }, "Comment deleted."))
}
