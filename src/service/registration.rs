//! Registration orchestrator: the "register a team" flows.
//!
//! Two entry points with no shared state: open/self-pay registration and
//! sponsor-code registration. Both upsert the roster and create the team;
//! the code-gated flow additionally redeems the credit through the ledger
//! and fires a best-effort confirmation email. Sponsor sign-up and team
//! withdrawal live here too since they span the same collaborators.

use uuid::Uuid;

use crate::domain::entities::{EventType, PlayerRole, Sponsor, Team};
use crate::domain::flight::{Flight, FlightEntry, assign_flights};
use crate::domain::handicap::{combined_handicap, playing_handicap};
use crate::error::RegistryError;
use crate::persistence::players::NewPlayer;
use crate::persistence::sponsors::NewSponsor;
use crate::persistence::teams::NewTeam;
use crate::persistence::{PlayerStore, SponsorStore, TeamStore};
use crate::service::credit_ledger::CreditLedger;
use crate::service::email::EmailService;

/// One roster entry on a registration form.
#[derive(Debug, Clone)]
pub struct PlayerEntry {
    /// Existing player chosen from autocomplete, if any.
    pub existing_player_id: Option<Uuid>,
    /// First name as typed.
    pub first_name: String,
    /// Last name as typed.
    pub last_name: String,
    /// GHIN id as typed; blank means none.
    pub ghin: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Roster role.
    pub role: PlayerRole,
}

impl PlayerEntry {
    /// Returns `true` when both trimmed names are non-blank. Blank
    /// entries are silently skipped during upsert, not rejected.
    #[must_use]
    pub fn has_name(&self) -> bool {
        !self.first_name.trim().is_empty() && !self.last_name.trim().is_empty()
    }
}

/// Input for open (self-pay) registration.
#[derive(Debug, Clone)]
pub struct OpenRegistration {
    /// Event year being registered for.
    pub event_year_id: Uuid,
    /// Which tournament event; `friday` is rejected here.
    pub event_type: EventType,
    /// Optional team name.
    pub team_name: Option<String>,
    /// Captain contact email (required).
    pub captain_email: String,
    /// Preferred session.
    pub session_preference: Option<String>,
    /// Payment method chosen on the form (no payment is processed).
    pub payment_method: String,
    /// Quoted entry fee in cents.
    pub entry_fee_cents: i64,
    /// Number of club-member discounts claimed.
    pub member_discount_count: u32,
    /// Roster entries.
    pub players: Vec<PlayerEntry>,
}

/// Input for sponsor-code registration.
#[derive(Debug, Clone)]
pub struct SponsorRegistration {
    /// Event year being registered for.
    pub event_year_id: Uuid,
    /// Which tournament event.
    pub event_type: EventType,
    /// Optional team name.
    pub team_name: Option<String>,
    /// Captain contact email (required).
    pub captain_email: String,
    /// Preferred session.
    pub session_preference: Option<String>,
    /// Roster entries.
    pub players: Vec<PlayerEntry>,
}

/// Input for sponsor sign-up.
#[derive(Debug, Clone)]
pub struct SponsorSignup {
    /// Event year the sponsorship belongs to.
    pub event_year_id: Uuid,
    /// Sponsor display name (required).
    pub name: String,
    /// Contact person name.
    pub contact_name: Option<String>,
    /// Contact email; the welcome email goes here when present.
    pub contact_email: Option<String>,
    /// Purchased package; supplies the credit count when
    /// `total_credits` is not given explicitly.
    pub package_id: Option<Uuid>,
    /// Free-text payment method.
    pub payment_method: Option<String>,
    /// Free-text payment status.
    pub payment_status: Option<String>,
    /// Explicit credit pool size, overriding the package.
    pub total_credits: Option<i32>,
}

/// An active weekend team with its computed standing.
#[derive(Debug, Clone)]
pub struct TeamStanding {
    /// The team row.
    pub team: Team,
    /// Combined playing handicap of the roster; `None` when no roster
    /// player has a handicap.
    pub combined_handicap: Option<f64>,
    /// Assigned flight; `None` when the combined handicap is unknown.
    pub flight: Option<Flight>,
}

/// Coordinator for registration flows.
#[derive(Debug, Clone)]
pub struct RegistrationService {
    players: PlayerStore,
    teams: TeamStore,
    sponsors: SponsorStore,
    ledger: CreditLedger,
    email: EmailService,
}

impl RegistrationService {
    /// Creates the service over its collaborators.
    #[must_use]
    pub fn new(
        players: PlayerStore,
        teams: TeamStore,
        sponsors: SponsorStore,
        ledger: CreditLedger,
        email: EmailService,
    ) -> Self {
        Self {
            players,
            teams,
            sponsors,
            ledger,
            email,
        }
    }

    /// Returns the credit ledger.
    #[must_use]
    pub const fn ledger(&self) -> &CreditLedger {
        &self.ledger
    }

    /// Registers a team without a sponsor code.
    ///
    /// No payment is processed here; the chosen method, quoted fee, and
    /// discount count are recorded as a note for back-office
    /// reconciliation.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::FridayRequiresSponsor`] for the
    /// sponsor-only Friday event, [`RegistryError::Validation`] for a
    /// missing captain email or empty roster, or
    /// [`RegistryError::Persistence`] on database failure.
    pub async fn register_open(&self, input: OpenRegistration) -> Result<Uuid, RegistryError> {
        if input.event_type == EventType::Friday {
            return Err(RegistryError::FridayRequiresSponsor);
        }
        validate_common(&input.captain_email, &input.players)?;

        let notes = payment_note(
            &input.payment_method,
            input.entry_fee_cents,
            input.member_discount_count,
        );

        let team = self
            .teams
            .insert(&NewTeam {
                event_year_id: input.event_year_id,
                event_type: input.event_type,
                name: input.team_name,
                sponsor_id: None,
                session_preference: input.session_preference,
                notes: Some(notes),
            })
            .await?;

        self.link_roster(team.id, &input.players).await?;

        tracing::info!(team_id = %team.id, "open registration complete");
        Ok(team.id)
    }

    /// Registers a team against a sponsor redemption code.
    ///
    /// The code is validated up front, but only the ledger's atomic
    /// redeem decides the winner if two captains race on the same code;
    /// a team that loses the race is cleaned up and the conflict
    /// reported. The confirmation email is fire-and-forget: once the
    /// team and credit are committed the registration has succeeded even
    /// if the email never arrives.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Validation`] for a missing captain email
    /// or empty roster, [`RegistryError::InvalidCode`] /
    /// [`RegistryError::CodeAlreadyUsed`] for a bad code, or
    /// [`RegistryError::Persistence`] on database failure.
    pub async fn register_with_code(
        &self,
        input: SponsorRegistration,
        code: &str,
    ) -> Result<(Uuid, String), RegistryError> {
        validate_common(&input.captain_email, &input.players)?;

        let credit = self.ledger.validate_and_reserve(code).await?;
        let sponsor = self.sponsors.get(credit.sponsor_id).await?;

        let team = self
            .teams
            .insert(&NewTeam {
                event_year_id: input.event_year_id,
                event_type: input.event_type,
                name: input.team_name.clone(),
                sponsor_id: None,
                session_preference: input.session_preference,
                notes: None,
            })
            .await?;

        self.link_roster(team.id, &input.players).await?;

        if let Err(err) = self
            .ledger
            .redeem(credit.id, team.id, &input.captain_email)
            .await
        {
            // Lost the race after creating the team; remove the orphan.
            if let Err(cleanup) = self.teams.delete(team.id).await {
                tracing::error!(team_id = %team.id, error = %cleanup, "orphan team cleanup failed");
            }
            return Err(err);
        }

        let email = self.email.clone();
        let to = input.captain_email.clone();
        let team_name = input.team_name.clone();
        let sponsor_name = sponsor.name.clone();
        tokio::spawn(async move {
            if let Err(e) = email
                .send_team_confirmation(&to, team_name.as_deref(), &sponsor_name)
                .await
            {
                tracing::warn!(to = %to, error = %e, "confirmation email failed");
            }
        });

        tracing::info!(team_id = %team.id, sponsor = %sponsor.name, "sponsor registration complete");
        Ok((team.id, sponsor.name))
    }

    /// Registers a sponsor: inserts the row with a fresh access token,
    /// issues the credit pool, and fire-and-forgets the welcome email.
    /// Returns the sponsor and the issued codes.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Validation`] for a blank name or unknown
    /// package, or [`RegistryError::Persistence`] on database failure.
    pub async fn register_sponsor(
        &self,
        input: SponsorSignup,
    ) -> Result<(Sponsor, Vec<String>), RegistryError> {
        if input.name.trim().is_empty() {
            return Err(RegistryError::Validation(
                "sponsor name is required".to_string(),
            ));
        }

        let total_credits = match input.total_credits {
            Some(n) if n >= 0 => n,
            Some(_) => {
                return Err(RegistryError::Validation(
                    "total_credits must not be negative".to_string(),
                ));
            }
            None => match input.package_id {
                Some(package_id) => self.sponsors.package(package_id).await?.credits,
                None => 0,
            },
        };

        let sponsor = self
            .sponsors
            .insert(&NewSponsor {
                event_year_id: input.event_year_id,
                name: input.name,
                contact_name: input.contact_name,
                contact_email: input.contact_email,
                package_id: input.package_id,
                payment_method: input.payment_method,
                payment_status: input.payment_status,
                total_credits,
                access_token: Uuid::new_v4().simple().to_string(),
            })
            .await?;

        let credits = self
            .ledger
            .issue(sponsor.id, usize::try_from(total_credits).unwrap_or(0))
            .await?;
        let codes: Vec<String> = credits
            .into_iter()
            .map(|c| c.redemption_code)
            .collect();

        if let Some(to) = sponsor.contact_email.clone() {
            let email = self.email.clone();
            let sponsor_name = sponsor.name.clone();
            let code_list = codes.clone();
            tokio::spawn(async move {
                if let Err(e) = email
                    .send_sponsor_welcome(&to, &sponsor_name, &code_list)
                    .await
                {
                    tracing::warn!(to = %to, error = %e, "sponsor welcome email failed");
                }
            });
        }

        tracing::info!(sponsor_id = %sponsor.id, credits = codes.len(), "sponsor registered");
        Ok((sponsor, codes))
    }

    /// Withdraws a team (soft delete) and restores its credit, if any.
    /// The restore is a no-op when another team reclaimed the credit in
    /// the interim.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::TeamNotFound`] for an unknown team, or
    /// [`RegistryError::Persistence`] on database failure.
    pub async fn withdraw_team(&self, team_id: Uuid) -> Result<Team, RegistryError> {
        let team = self.teams.withdraw(team_id).await?;

        if let Some(credit_id) = team.credit_id {
            self.ledger.restore(credit_id, team.id).await?;
            return self.teams.get(team_id).await;
        }
        Ok(team)
    }

    /// Computes standings for the active weekend field: combined roster
    /// handicaps and the two-flight median split. Teams with no handicap
    /// data appear last with no flight.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on database failure.
    pub async fn flight_standings(&self) -> Result<Vec<TeamStanding>, RegistryError> {
        let teams = self.teams.list_active(Some(EventType::SatSun)).await?;

        let mut combined_by_team = Vec::with_capacity(teams.len());
        let mut entries = Vec::new();
        for team in teams {
            let roster = self.teams.roster(team.id).await?;
            let handicaps: Vec<Option<f64>> = roster
                .iter()
                .map(|member| playing_handicap(&member.player))
                .collect();
            let combined = combined_handicap(&handicaps);
            if let Some(value) = combined {
                entries.push(FlightEntry {
                    team_id: team.id,
                    combined_handicap: value,
                });
            }
            combined_by_team.push((team, combined));
        }

        let assignments = assign_flights(&entries);
        let flight_of = |team_id: Uuid| {
            assignments
                .iter()
                .find(|a| a.team_id == team_id)
                .map(|a| a.flight)
        };

        let mut standings: Vec<TeamStanding> = combined_by_team
            .into_iter()
            .map(|(team, combined)| TeamStanding {
                flight: flight_of(team.id),
                combined_handicap: combined,
                team,
            })
            .collect();
        // Ranked teams first, ascending by combined handicap.
        standings.sort_by(|a, b| match (a.combined_handicap, b.combined_handicap) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        Ok(standings)
    }

    /// Upserts and links each named roster entry onto the team.
    ///
    /// Blank-name entries are skipped. An existing player gets a GHIN
    /// backfill only while none is on file; new players default to the
    /// GHIN sentinel.
    async fn link_roster(
        &self,
        team_id: Uuid,
        entries: &[PlayerEntry],
    ) -> Result<(), RegistryError> {
        for entry in entries {
            if !entry.has_name() {
                continue;
            }

            let player_id = match entry.existing_player_id {
                Some(id) => {
                    if let Some(ghin) = entry.ghin.as_deref().map(str::trim) {
                        if !ghin.is_empty() {
                            self.players.backfill_ghin(id, ghin).await?;
                        }
                    }
                    id
                }
                None => {
                    self.players
                        .insert(&NewPlayer {
                            first_name: entry.first_name.trim().to_string(),
                            last_name: entry.last_name.trim().to_string(),
                            suffix: None,
                            email: entry.email.clone(),
                            phone: None,
                            ghin: entry.ghin.clone(),
                            handicap_raw: None,
                            plays_forward_tees: false,
                        })
                        .await?
                        .id
                }
            };

            self.teams
                .add_roster_member(team_id, player_id, entry.role)
                .await?;
        }
        Ok(())
    }
}

/// Builds the back-office payment note for open registrations.
fn payment_note(method: &str, entry_fee_cents: i64, member_discount_count: u32) -> String {
    format!(
        "self-pay: method={method}, fee=${:.2}, member_discounts={member_discount_count}",
        entry_fee_cents as f64 / 100.0,
    )
}

/// Shared precondition check for both registration flows.
fn validate_common(captain_email: &str, players: &[PlayerEntry]) -> Result<(), RegistryError> {
    if captain_email.trim().is_empty() {
        return Err(RegistryError::Validation(
            "captain email is required".to_string(),
        ));
    }
    if !players.iter().any(PlayerEntry::has_name) {
        return Err(RegistryError::Validation(
            "at least one player is required".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn entry(first: &str, last: &str) -> PlayerEntry {
        PlayerEntry {
            existing_player_id: None,
            first_name: first.to_string(),
            last_name: last.to_string(),
            ghin: None,
            email: None,
            role: PlayerRole::Player,
        }
    }

    #[test]
    fn payment_note_summarizes_method_fee_and_discounts() {
        let note = payment_note("check", 25_000, 2);
        assert_eq!(note, "self-pay: method=check, fee=$250.00, member_discounts=2");
    }

    #[test]
    fn blank_names_do_not_count_toward_the_roster() {
        assert!(!entry("", "").has_name());
        assert!(!entry("  ", "Jones").has_name());
        assert!(!entry("Bobby", " ").has_name());
        assert!(entry("Bobby", "Jones").has_name());
    }

    #[test]
    fn validate_requires_captain_email() {
        let err = validate_common("  ", &[entry("Bobby", "Jones")]);
        assert!(matches!(err, Err(RegistryError::Validation(_))));
    }

    #[test]
    fn validate_requires_at_least_one_named_player() {
        let err = validate_common("captain@example.com", &[entry("", "")]);
        assert!(matches!(err, Err(RegistryError::Validation(_))));

        let ok = validate_common("captain@example.com", &[entry("", ""), entry("Bobby", "Jones")]);
        assert!(ok.is_ok());
    }
}
