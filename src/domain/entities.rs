//! Row-shaped domain entities backed by the relational store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel GHIN value meaning "no GHIN id on file".
pub const GHIN_NONE: &str = "NONE";

/// Tournament event a team plays in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
pub enum EventType {
    /// Friday scramble — sponsor-only, no open registration.
    Friday,
    /// Saturday/Sunday main event, split into flights.
    SatSun,
}

/// Roster role of a player on a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
pub enum PlayerRole {
    /// Regular competing player.
    Player,
    /// SEAL guest slot (non-competing).
    SealGuest,
}

/// A registered player with golf attributes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Player {
    /// Unique player identifier.
    pub id: Uuid,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Name suffix (Jr., III, …).
    pub suffix: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// GHIN identifier; [`GHIN_NONE`] means absent.
    pub ghin: String,
    /// Raw handicap index; `None` when no handicap is on file.
    pub handicap_raw: Option<f64>,
    /// Whether the player tees off from the forward markers.
    pub plays_forward_tees: bool,
    /// When the handicap was last refreshed from GHIN.
    pub last_handicap_update_at: Option<DateTime<Utc>>,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Returns `true` when a real GHIN id is on file (not blank, not the
    /// [`GHIN_NONE`] sentinel).
    #[must_use]
    pub fn has_ghin(&self) -> bool {
        !self.ghin.trim().is_empty() && self.ghin != GHIN_NONE
    }
}

/// A tournament sponsor holding a pool of redemption credits.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Sponsor {
    /// Unique sponsor identifier.
    pub id: Uuid,
    /// Event year this sponsorship belongs to.
    pub event_year_id: Uuid,
    /// Sponsor display name.
    pub name: String,
    /// Contact person name.
    pub contact_name: Option<String>,
    /// Contact email.
    pub contact_email: Option<String>,
    /// Purchased sponsorship package, if any.
    pub package_id: Option<Uuid>,
    /// Free-text payment method.
    pub payment_method: Option<String>,
    /// Free-text payment status.
    pub payment_status: Option<String>,
    /// Size of the credit pool. Invariant: `0 <= credits_used <= total_credits`.
    pub total_credits: i32,
    /// Opaque capability token for sponsor self-service (a secret, not a
    /// user id).
    pub access_token: String,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// One redemption slot in a sponsor's credit pool.
///
/// A credit is *available* while `redeemed_by_team_id` is null and
/// *redeemed* once it points at exactly one team. A restore (team
/// withdrawal) nulls the redemption fields but preserves the
/// `captain_email` / `email_sent_at` history.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct SponsorCredit {
    /// Unique credit identifier.
    pub id: Uuid,
    /// Owning sponsor.
    pub sponsor_id: Uuid,
    /// Unique human-typable redemption code (`PREFIX-YYYY-XXXX`).
    pub redemption_code: String,
    /// Team that claimed this credit; null while available.
    pub redeemed_by_team_id: Option<Uuid>,
    /// When the credit was claimed.
    pub redeemed_at: Option<DateTime<Utc>>,
    /// Captain email captured at redemption (or invite) time.
    pub captain_email: Option<String>,
    /// When the captain-code invite email was sent.
    pub email_sent_at: Option<DateTime<Utc>>,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl SponsorCredit {
    /// Returns `true` while the credit has not been claimed by a team.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.redeemed_by_team_id.is_none()
    }
}

/// A registered team.
///
/// `sponsor_id` and `credit_id` are both null (open registration) or both
/// set (sponsor-code registration); the referenced credit's
/// `redeemed_by_team_id` must equal this team's id. The ledger maintains
/// both sides in a single transaction.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Team {
    /// Unique team identifier.
    pub id: Uuid,
    /// Event year this team registered for.
    pub event_year_id: Uuid,
    /// Which tournament event the team plays.
    pub event_type: EventType,
    /// Optional team name.
    pub name: Option<String>,
    /// Sponsor backing this team, when registered with a code.
    pub sponsor_id: Option<Uuid>,
    /// Credit consumed by this team, when registered with a code.
    pub credit_id: Option<Uuid>,
    /// Preferred session (morning/afternoon).
    pub session_preference: Option<String>,
    /// Free-text notes, including the self-pay payment summary.
    pub notes: Option<String>,
    /// Soft-delete marker; null means active.
    pub withdrawn_at: Option<DateTime<Utc>>,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Returns `true` while the team has not withdrawn.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.withdrawn_at.is_none()
    }
}

/// Join row linking a player onto a team roster.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct TeamPlayer {
    /// Team side of the link.
    pub team_id: Uuid,
    /// Player side of the link.
    pub player_id: Uuid,
    /// Roster role.
    pub role: PlayerRole,
}

/// A tournament year.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct EventYear {
    /// Unique identifier.
    pub id: Uuid,
    /// Calendar year.
    pub year: i32,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A purchasable sponsorship tier.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct SponsorshipPackage {
    /// Unique identifier.
    pub id: Uuid,
    /// Event year the package applies to.
    pub event_year_id: Uuid,
    /// Package display name.
    pub name: String,
    /// Price in cents.
    pub price_cents: i64,
    /// Number of team credits the package grants.
    pub credits: i32,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn player(ghin: &str) -> Player {
        Player {
            id: Uuid::new_v4(),
            first_name: "Pat".to_string(),
            last_name: "Lee".to_string(),
            suffix: None,
            email: None,
            phone: None,
            ghin: ghin.to_string(),
            handicap_raw: None,
            plays_forward_tees: false,
            last_handicap_update_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn ghin_sentinel_counts_as_absent() {
        assert!(!player(GHIN_NONE).has_ghin());
        assert!(!player("").has_ghin());
        assert!(!player("  ").has_ghin());
        assert!(player("1234567").has_ghin());
    }

    #[test]
    fn event_type_serializes_snake_case() {
        let json = serde_json::to_string(&EventType::SatSun).ok();
        assert_eq!(json.as_deref(), Some("\"sat_sun\""));
        let json = serde_json::to_string(&EventType::Friday).ok();
        assert_eq!(json.as_deref(), Some("\"friday\""));
    }
}
