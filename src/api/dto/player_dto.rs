//! Player endpoint DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::dto::PaginationMeta;
use crate::domain::entities::Player;

/// Query parameters for the player autocomplete list.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PlayerSearchParams {
    /// Case-insensitive substring match against first and last name.
    #[serde(default)]
    pub search: Option<String>,
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default)]
    pub page: Option<u32>,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Request body for creating or updating a player.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpsertPlayerRequest {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Name suffix (Jr., III, …).
    #[serde(default)]
    pub suffix: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// GHIN id; blank or absent stores the `NONE` sentinel.
    #[serde(default)]
    pub ghin: Option<String>,
    /// Raw handicap index.
    #[serde(default)]
    pub handicap_raw: Option<f64>,
    /// Forward-tee flag.
    #[serde(default)]
    pub plays_forward_tees: bool,
}

/// Paginated player list.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerListResponse {
    /// Players on this page.
    pub data: Vec<Player>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
