//! Registration endpoint DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::entities::{EventType, PlayerRole};
use crate::service::registration::{OpenRegistration, PlayerEntry, SponsorRegistration};

/// One roster entry on a registration form.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PlayerEntryDto {
    /// Existing player chosen from autocomplete.
    #[serde(default)]
    pub existing_player_id: Option<Uuid>,
    /// First name as typed.
    #[serde(default)]
    pub first_name: String,
    /// Last name as typed.
    #[serde(default)]
    pub last_name: String,
    /// GHIN id as typed.
    #[serde(default)]
    pub ghin: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Roster role. Defaults to `player`.
    #[serde(default = "default_role")]
    pub role: PlayerRole,
}

const fn default_role() -> PlayerRole {
    PlayerRole::Player
}

impl From<PlayerEntryDto> for PlayerEntry {
    fn from(dto: PlayerEntryDto) -> Self {
        Self {
            existing_player_id: dto.existing_player_id,
            first_name: dto.first_name,
            last_name: dto.last_name,
            ghin: dto.ghin,
            email: dto.email,
            role: dto.role,
        }
    }
}

/// Request body for open (self-pay) registration.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OpenRegistrationRequest {
    /// Event year being registered for.
    pub event_year_id: Uuid,
    /// Which tournament event.
    pub event_type: EventType,
    /// Optional team name.
    #[serde(default)]
    pub team_name: Option<String>,
    /// Captain contact email.
    pub captain_email: String,
    /// Preferred session.
    #[serde(default)]
    pub session_preference: Option<String>,
    /// Payment method chosen on the form.
    pub payment_method: String,
    /// Quoted entry fee in cents.
    pub entry_fee_cents: i64,
    /// Number of club-member discounts claimed.
    #[serde(default)]
    pub member_discount_count: u32,
    /// Roster entries.
    pub players: Vec<PlayerEntryDto>,
}

impl From<OpenRegistrationRequest> for OpenRegistration {
    fn from(req: OpenRegistrationRequest) -> Self {
        Self {
            event_year_id: req.event_year_id,
            event_type: req.event_type,
            team_name: req.team_name,
            captain_email: req.captain_email,
            session_preference: req.session_preference,
            payment_method: req.payment_method,
            entry_fee_cents: req.entry_fee_cents,
            member_discount_count: req.member_discount_count,
            players: req.players.into_iter().map(PlayerEntry::from).collect(),
        }
    }
}

/// Request body for code-gated registration.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SponsorRegistrationRequest {
    /// Sponsor redemption code.
    pub code: String,
    /// Event year being registered for.
    pub event_year_id: Uuid,
    /// Which tournament event.
    pub event_type: EventType,
    /// Optional team name.
    #[serde(default)]
    pub team_name: Option<String>,
    /// Captain contact email.
    pub captain_email: String,
    /// Preferred session.
    #[serde(default)]
    pub session_preference: Option<String>,
    /// Roster entries.
    pub players: Vec<PlayerEntryDto>,
}

impl From<SponsorRegistrationRequest> for SponsorRegistration {
    fn from(req: SponsorRegistrationRequest) -> Self {
        Self {
            event_year_id: req.event_year_id,
            event_type: req.event_type,
            team_name: req.team_name,
            captain_email: req.captain_email,
            session_preference: req.session_preference,
            players: req.players.into_iter().map(PlayerEntry::from).collect(),
        }
    }
}

/// Response for a completed registration.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationResponse {
    /// The created team.
    pub team_id: Uuid,
    /// Backing sponsor name (code registrations only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsor_name: Option<String>,
}

/// Response for a code validation lookup.
#[derive(Debug, Serialize, ToSchema)]
pub struct CodeValidationResponse {
    /// The looked-up code.
    pub code: String,
    /// Name of the sponsor that owns the code.
    pub sponsor_name: String,
    /// Always `true`; unknown or used codes error instead.
    pub valid: bool,
}
