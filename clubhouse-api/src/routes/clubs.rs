/// Club, membership and role endpoints
///
/// - `GET /clubs`, `POST /clubs` (the caller becomes owner)
/// - `GET|PUT|DELETE /clubs/:id`
/// - `GET /clubs/:id/users?role=`, `POST /clubs/:id/users` (join),
///   `DELETE /clubs/:id/users` (leave)
/// - `PUT /clubs/:id/users/:user_id` with `{"role": "admin"}`

use axum::{extract::State, http::StatusCode};
use clubhouse_shared::models::{Club, CreateClub, MemberDto, UpdateClub};
use serde::Deserialize;

use super::{created, ok, Envelope, IdPayload};
use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiJson, ApiPath, ApiQuery, AuthUser, ValidatedJson},
};

#[derive(Debug, Default, Deserialize)]
pub struct MemberQuery {
    /// Only members holding this role
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    /// Raw role name; unknown values are rejected by the service
    pub role: String,
}

pub async fn list_clubs(State(state): State<AppState>) -> ApiResult<Envelope<Vec<Club>>> {
    let clubs = state.services.memberships.find_all_clubs().await?;
    Ok(ok(clubs, "Loaded all clubs."))
}

pub async fn create_club(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidatedJson(input): ValidatedJson<CreateClub>,
) -> ApiResult<(StatusCode, Envelope<IdPayload>)> {
    let club_id = state.services.memberships.found_club(user_id, input).await?;
    Ok(created(club_id, "Club created."))
}

pub async fn get_club(
    State(state): State<AppState>,
    ApiPath(club_id): ApiPath<i64>,
) -> ApiResult<Envelope<Club>> {
    let club = state.services.memberships.find_club(club_id).await?;
    Ok(ok(club, "Loaded the club."))
}

pub async fn update_club(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(club_id): ApiPath<i64>,
    ValidatedJson(changes): ValidatedJson<UpdateClub>,
) -> ApiResult<Envelope<Club>> {
    let club = state
        .services
        .memberships
        .update_club(club_id, user_id, changes)
        .await?;
    Ok(ok(club, "Club updated."))
}

pub async fn delete_club(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(club_id): ApiPath<i64>,
) -> ApiResult<Envelope<IdPayload>> {
    state
        .services
        .memberships
        .delete_club(club_id, user_id)
        .await?;
    Ok(ok(IdPayload { id: club_id }, "Club deleted."))
}

pub async fn list_members(
    State(state): State<AppState>,
    ApiPath(club_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<MemberQuery>,
) -> ApiResult<Envelope<Vec<MemberDto>>> {
    let members = state
        .services
        .memberships
        .list_members(club_id, query.role.as_deref())
        .await?;
    Ok(ok(members, "Loaded club members."))
}

pub async fn join_club(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(club_id): ApiPath<i64>,
) -> ApiResult<(StatusCode, Envelope<IdPayload>)> {
    let membership_id = state.services.memberships.join(user_id, club_id).await?;
    Ok(created(membership_id, "Joined the club."))
}

pub async fn leave_club(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(club_id): ApiPath<i64>,
) -> ApiResult<Envelope<IdPayload>> {
    state.services.memberships.leave(user_id, club_id).await?;
    Ok(ok(IdPayload { id: club_id }, "Left the club."))
}

pub async fn set_role(
    State(state): State<AppState>,
    AuthUser(acting_user_id): AuthUser,
    ApiPath((club_id, user_id)): ApiPath<(i64, i64)>,
    ApiJson(request): ApiJson<SetRoleRequest>,
) -> ApiResult<Envelope<IdPayload>> {
    let membership_id = state
        .services
        .memberships
        .set_role(club_id, user_id, &request.role, acting_user_id)
        .await?;
    Ok(ok(IdPayload { id: membership_id }, "Role updated."))
}
