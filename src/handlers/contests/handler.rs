//! Contest handler implementations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{error::AppResult, state::AppState};

use super::{
    request::{CreateContestRequest, UpdateContestRequest},
    response::{ContestResponse, ContestsListResponse, RosterOptionsResponse},
};

/// List all contests
pub async fn list_contests(
    State(state): State<AppState>,
) -> AppResult<Json<ContestsListResponse>> {
    let contests = state.contests().list(Utc::now()).await?;
    let total = contests.len();

    Ok(Json(ContestsListResponse { contests, total }))
}

/// Create a new contest
pub async fn create_contest(
    State(state): State<AppState>,
    Json(payload): Json<CreateContestRequest>,
) -> AppResult<(StatusCode, Json<ContestResponse>)> {
    payload.validate()?;

    let contest = state.contests().create(payload, Utc::now()).await?;

    Ok((StatusCode::CREATED, Json(contest)))
}

/// Get a specific contest with its roster
pub async fn get_contest(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ContestResponse>> {
    let contest = state.contests().get(id, Utc::now()).await?;
    Ok(Json(contest))
}

/// Update a contest, replacing all fields and both roster sets
pub async fn update_contest(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateContestRequest>,
) -> AppResult<Json<ContestResponse>> {
    payload.validate()?;

    let contest = state.contests().update(id, payload, Utc::now()).await?;

    Ok(Json(contest))
}

/// Delete a contest
pub async fn delete_contest(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.contests().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Every known user email and problem slug, for the add/edit form
pub async fn roster_options(
    State(state): State<AppState>,
) -> AppResult<Json<RosterOptionsResponse>> {
    let options = state.contests().roster_options().await?;
    Ok(Json(options))
}
