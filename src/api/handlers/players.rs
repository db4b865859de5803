//! Player handlers: the cached autocomplete list plus admin CRUD.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router};
use axum::routing::{get, put};
use uuid::Uuid;

use crate::api::auth::RequireAdmin;
use crate::api::dto::{
    PaginationParams, PlayerListResponse, PlayerSearchParams, UpsertPlayerRequest,
};
use crate::app_state::AppState;
use crate::domain::entities::Player;
use crate::error::{ErrorResponse, RegistryError};
use crate::persistence::players::NewPlayer;

/// `GET /players` — Autocomplete list with search and pagination.
///
/// Served through the TTL'd player cache; a miss loads the full list from
/// the store and repopulates it.
///
/// # Errors
///
/// Returns [`RegistryError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/players",
    tag = "Players",
    summary = "List players",
    description = "Returns a paginated player list for registration autocomplete, optionally filtered by a case-insensitive name search.",
    params(PlayerSearchParams),
    responses(
        (status = 200, description = "Paginated player list", body = PlayerListResponse),
    )
)]
pub async fn list_players(
    State(state): State<AppState>,
    Query(params): Query<PlayerSearchParams>,
) -> Result<impl IntoResponse, RegistryError> {
    let players = match state.player_cache.get().await {
        Some(cached) => cached,
        None => {
            let loaded = state.players.list().await?;
            state.player_cache.store(loaded.clone()).await;
            loaded
        }
    };

    let filtered = filter_players(players, params.search.as_deref());

    let pagination = PaginationParams {
        page: params.page.unwrap_or(1),
        per_page: params.per_page.unwrap_or(20),
    }
    .clamped();

    let total = u32::try_from(filtered.len()).unwrap_or(u32::MAX);
    let data = page_slice(filtered, &pagination);

    Ok(Json(PlayerListResponse {
        data,
        pagination: pagination.meta(total),
    }))
}

/// `POST /players` — Create a player (admin).
///
/// # Errors
///
/// Returns [`RegistryError::Validation`] on a blank name, or
/// [`RegistryError::Persistence`] on database failure.
#[utoipa::path(
    post,
    path = "/api/v1/players",
    tag = "Players",
    summary = "Create a player",
    request_body = UpsertPlayerRequest,
    responses(
        (status = 201, description = "Player created", body = Player),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
    )
)]
pub async fn create_player(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(req): Json<UpsertPlayerRequest>,
) -> Result<impl IntoResponse, RegistryError> {
    let new = to_new_player(req)?;
    let player = state.players.insert(&new).await?;
    state.player_cache.invalidate().await;
    Ok((StatusCode::CREATED, Json(player)))
}

/// `PUT /players/{id}` — Update a player (admin).
///
/// # Errors
///
/// Returns [`RegistryError::PlayerNotFound`] for an unknown id,
/// [`RegistryError::Validation`] on a blank name, or
/// [`RegistryError::Persistence`] on database failure.
#[utoipa::path(
    put,
    path = "/api/v1/players/{id}",
    tag = "Players",
    summary = "Update a player",
    params(
        ("id" = Uuid, Path, description = "Player UUID"),
    ),
    request_body = UpsertPlayerRequest,
    responses(
        (status = 200, description = "Player updated", body = Player),
        (status = 404, description = "Player not found", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
    )
)]
pub async fn update_player(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpsertPlayerRequest>,
) -> Result<impl IntoResponse, RegistryError> {
    let update = to_new_player(req)?;
    let player = state.players.update(id, &update).await?;
    state.player_cache.invalidate().await;
    Ok(Json(player))
}

/// `DELETE /players/{id}` — Remove a player (admin).
///
/// # Errors
///
/// Returns [`RegistryError::PlayerNotFound`] for an unknown id, or
/// [`RegistryError::Persistence`] on database failure.
#[utoipa::path(
    delete,
    path = "/api/v1/players/{id}",
    tag = "Players",
    summary = "Delete a player",
    params(
        ("id" = Uuid, Path, description = "Player UUID"),
    ),
    responses(
        (status = 204, description = "Player deleted"),
        (status = 404, description = "Player not found", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
    )
)]
pub async fn delete_player(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, RegistryError> {
    state.players.delete(id).await?;
    state.player_cache.invalidate().await;
    Ok(StatusCode::NO_CONTENT)
}

/// Takes one page out of the filtered list. The offset math saturates in
/// `usize` so an absurd `page` yields an empty page instead of an
/// overflow panic.
fn page_slice(players: Vec<Player>, pagination: &PaginationParams) -> Vec<Player> {
    let start = (pagination.page as usize)
        .saturating_sub(1)
        .saturating_mul(pagination.per_page as usize);
    players
        .into_iter()
        .skip(start)
        .take(pagination.per_page as usize)
        .collect()
}

/// Case-insensitive substring filter over first and last names.
fn filter_players(players: Vec<Player>, search: Option<&str>) -> Vec<Player> {
    let Some(needle) = search.map(str::trim).filter(|s| !s.is_empty()) else {
        return players;
    };
    let needle = needle.to_lowercase();
    players
        .into_iter()
        .filter(|p| {
            p.first_name.to_lowercase().contains(&needle)
                || p.last_name.to_lowercase().contains(&needle)
        })
        .collect()
}

fn to_new_player(req: UpsertPlayerRequest) -> Result<NewPlayer, RegistryError> {
    let first_name = req.first_name.trim().to_string();
    let last_name = req.last_name.trim().to_string();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(RegistryError::Validation(
            "first and last name are required".to_string(),
        ));
    }
    Ok(NewPlayer {
        first_name,
        last_name,
        suffix: req.suffix,
        email: req.email,
        phone: req.phone,
        ghin: req.ghin,
        handicap_raw: req.handicap_raw,
        plays_forward_tees: req.plays_forward_tees,
    })
}

/// Player routes. The mutating handlers gate themselves on the admin
/// cookie.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/players", get(list_players).post(create_player))
        .route("/players/{id}", put(update_player).delete(delete_player))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn player(first: &str, last: &str) -> Player {
        Player {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            suffix: None,
            email: None,
            phone: None,
            ghin: "NONE".to_string(),
            handicap_raw: None,
            plays_forward_tees: false,
            last_handicap_update_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn filter_matches_either_name_case_insensitively() {
        let players = vec![
            player("Annika", "Sorenstam"),
            player("Tiger", "Woods"),
            player("Tigran", "Petrosian"),
        ];
        let hits = filter_players(players, Some("tig"));
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn blank_search_returns_everything() {
        let players = vec![player("Annika", "Sorenstam"), player("Tiger", "Woods")];
        assert_eq!(filter_players(players.clone(), None).len(), 2);
        assert_eq!(filter_players(players, Some("  ")).len(), 2);
    }

    #[test]
    fn page_slice_returns_requested_window() {
        let players = vec![
            player("Annika", "Sorenstam"),
            player("Tiger", "Woods"),
            player("Ben", "Hogan"),
        ];
        let pagination = PaginationParams {
            page: 2,
            per_page: 2,
        };
        let page = page_slice(players, &pagination);
        assert_eq!(page.len(), 1);
        assert_eq!(
            page.first().map(|p| p.last_name.as_str()),
            Some("Hogan")
        );
    }

    #[test]
    fn page_slice_survives_maximum_page_number() {
        let players = vec![player("Tiger", "Woods")];
        let pagination = PaginationParams {
            page: u32::MAX,
            per_page: 100,
        };
        assert!(page_slice(players, &pagination).is_empty());
    }

    #[test]
    fn upsert_requires_both_names() {
        let req = UpsertPlayerRequest {
            first_name: "  ".to_string(),
            last_name: "Woods".to_string(),
            suffix: None,
            email: None,
            phone: None,
            ghin: None,
            handicap_raw: None,
            plays_forward_tees: false,
        };
        assert!(matches!(
            to_new_player(req),
            Err(RegistryError::Validation(_))
        ));
    }
}
