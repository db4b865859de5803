//! Team and flight endpoint DTOs.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::entities::{Player, PlayerRole, Team};
use crate::domain::flight::Flight;

/// One roster entry in a team response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RosterMemberDto {
    /// The player.
    pub player: Player,
    /// Roster role.
    pub role: PlayerRole,
}

/// A team with its full roster.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamDetailResponse {
    /// The team row.
    #[serde(flatten)]
    pub team: Team,
    /// Roster with roles.
    pub roster: Vec<RosterMemberDto>,
}

/// One team in the flight standings.
#[derive(Debug, Serialize, ToSchema)]
pub struct FlightStandingDto {
    /// Team identifier.
    pub team_id: Uuid,
    /// Team name, if any.
    pub team_name: Option<String>,
    /// Combined roster handicap; absent when no player has one on file.
    pub combined_handicap: Option<f64>,
    /// Flight number (1 or 2); absent when the handicap is unknown.
    pub flight: Option<u8>,
}

impl FlightStandingDto {
    /// Maps a computed standing into its wire shape.
    #[must_use]
    pub fn new(team: &Team, combined_handicap: Option<f64>, flight: Option<Flight>) -> Self {
        Self {
            team_id: team.id,
            team_name: team.name.clone(),
            combined_handicap,
            flight: flight.map(Flight::number),
        }
    }
}

/// Flight standings for the weekend field.
#[derive(Debug, Serialize, ToSchema)]
pub struct FlightStandingsResponse {
    /// Teams ordered by combined handicap, unranked teams last.
    pub data: Vec<FlightStandingDto>,
}
