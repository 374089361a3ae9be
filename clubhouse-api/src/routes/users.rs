/// User endpoints
///
/// - `POST /users`: registration, no token needed
/// - `GET /users`, `GET /users/:id`
/// - `PUT|DELETE /users/:id`: only on the caller's own account
/// - `GET /users/:id/clubs`: the user's memberships
///
/// Users are always returned without their password hash.

use axum::{extract::State, http::StatusCode};
use clubhouse_shared::models::{CreateUser, Membership, UpdateUser, UserDto};

use super::{created, ok, Envelope, IdPayload};
use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiPath, AuthUser, ValidatedJson},
};

pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> ApiResult<(StatusCode, Envelope<IdPayload>)> {
    let user_id = state.services.users.create_user(input).await?;
    Ok(created(user_id, "User registered."))
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Envelope<Vec<UserDto>>> {
    let users = state.services.users.find_all_users().await?;
    Ok(ok(users, "Loaded all users."))
}

pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Envelope<UserDto>> {
    let user = state.services.users.find_user(user_id).await?;
    Ok(ok(user, "Loaded the user."))
}

pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(acting_user_id): AuthUser,
    ApiPath(user_id): ApiPath<i64>,
    ValidatedJson(changes): ValidatedJson<UpdateUser>,
) -> ApiResult<Envelope<UserDto>> {
    let user = state
        .services
        .users
        .update_user(user_id, acting_user_id, changes)
        .await?;
    Ok(ok(user, "User updated."))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(acting_user_id): AuthUser,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Envelope<IdPayload>> {
    state
        .services
        .users
        .delete_user(user_id, acting_user_id)
        .await?;
    Ok(ok(IdPayload { id: user_id }, "User deleted."))
}

pub async fn list_user_clubs(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Envelope<Vec<Membership>>> {
    let memberships = state.services.users.list_clubs_of_user(user_id).await?;
    Ok(ok(memberships, "Loaded the user's clubs."))
}
