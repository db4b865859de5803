//! Team handlers: listing, detail with roster, withdrawal, and flights.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::auth::RequireAdmin;
use crate::api::dto::{
    FlightStandingDto, FlightStandingsResponse, RosterMemberDto, TeamDetailResponse,
};
use crate::app_state::AppState;
use crate::domain::entities::{EventType, Team};
use crate::error::{ErrorResponse, RegistryError};

/// Query parameters for the team list.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct TeamListParams {
    /// Filter by tournament event.
    #[serde(default)]
    pub event_type: Option<EventType>,
}

/// `GET /teams` — List active teams.
///
/// # Errors
///
/// Returns [`RegistryError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/teams",
    tag = "Teams",
    summary = "List active teams",
    description = "Returns all non-withdrawn teams, optionally filtered by event.",
    params(TeamListParams),
    responses(
        (status = 200, description = "Active teams", body = Vec<Team>),
    )
)]
pub async fn list_teams(
    State(state): State<AppState>,
    Query(params): Query<TeamListParams>,
) -> Result<impl IntoResponse, RegistryError> {
    let teams = state.teams.list_active(params.event_type).await?;
    Ok(Json(teams))
}

/// `GET /teams/{id}` — Team detail with roster.
///
/// # Errors
///
/// Returns [`RegistryError::TeamNotFound`] for an unknown id, or
/// [`RegistryError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/teams/{id}",
    tag = "Teams",
    summary = "Get team details",
    params(
        ("id" = Uuid, Path, description = "Team UUID"),
    ),
    responses(
        (status = 200, description = "Team with roster", body = TeamDetailResponse),
        (status = 404, description = "Team not found", body = ErrorResponse),
    )
)]
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, RegistryError> {
    let team = state.teams.get(id).await?;
    let roster = state
        .teams
        .roster(id)
        .await?
        .into_iter()
        .map(|m| RosterMemberDto {
            player: m.player,
            role: m.role,
        })
        .collect();
    Ok(Json(TeamDetailResponse { team, roster }))
}

/// `DELETE /teams/{id}` — Withdraw a team (admin).
///
/// A soft delete: the team row stays for history, and a linked sponsor
/// credit goes back into the pool.
///
/// # Errors
///
/// Returns [`RegistryError::TeamNotFound`] for an unknown id, or
/// [`RegistryError::Persistence`] on database failure.
#[utoipa::path(
    delete,
    path = "/api/v1/teams/{id}",
    tag = "Teams",
    summary = "Withdraw a team",
    description = "Marks the team withdrawn and restores its sponsor credit, if any.",
    params(
        ("id" = Uuid, Path, description = "Team UUID"),
    ),
    responses(
        (status = 200, description = "Withdrawn team", body = Team),
        (status = 404, description = "Team not found", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
    )
)]
pub async fn withdraw_team(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, RegistryError> {
    let team = state.registration.withdraw_team(id).await?;
    Ok(Json(team))
}

/// `GET /flights` — Flight standings for the weekend field.
///
/// # Errors
///
/// Returns [`RegistryError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/flights",
    tag = "Teams",
    summary = "Flight standings",
    description = "Combined roster handicaps and the two-flight median split for active Saturday/Sunday teams.",
    responses(
        (status = 200, description = "Flight standings", body = FlightStandingsResponse),
    )
)]
pub async fn flight_standings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, RegistryError> {
    let standings = state.registration.flight_standings().await?;
    let data = standings
        .iter()
        .map(|s| FlightStandingDto::new(&s.team, s.combined_handicap, s.flight))
        .collect();
    Ok(Json(FlightStandingsResponse { data }))
}

/// Team routes. Withdrawal gates itself on the admin cookie.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/teams", get(list_teams))
        .route("/teams/{id}", get(get_team).delete(withdraw_team))
        .route("/flights", get(flight_standings))
}
