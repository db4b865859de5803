//! Team store: team rows, rosters, and the soft-delete withdrawal.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{EventType, Player, PlayerRole, Team};
use crate::error::RegistryError;

/// Fields for inserting a new team.
#[derive(Debug, Clone)]
pub struct NewTeam {
    /// Event year the team registered for.
    pub event_year_id: Uuid,
    /// Which tournament event the team plays.
    pub event_type: EventType,
    /// Optional team name.
    pub name: Option<String>,
    /// Sponsor backing the team (set only for code registrations).
    pub sponsor_id: Option<Uuid>,
    /// Preferred session.
    pub session_preference: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// A roster entry: the player plus their role on the team.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RosterMember {
    /// The player row.
    #[sqlx(flatten)]
    pub player: Player,
    /// Roster role.
    pub role: PlayerRole,
}

/// PostgreSQL-backed team store.
#[derive(Debug, Clone)]
pub struct TeamStore {
    pool: PgPool,
}

impl TeamStore {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new team row. `credit_id` starts null; the credit ledger
    /// links it when a credit is redeemed.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on database failure.
    pub async fn insert(&self, new: &NewTeam) -> Result<Team, RegistryError> {
        sqlx::query_as::<_, Team>(
            "INSERT INTO teams \
             (event_year_id, event_type, name, sponsor_id, session_preference, notes) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(new.event_year_id)
        .bind(new.event_type)
        .bind(&new.name)
        .bind(new.sponsor_id)
        .bind(&new.session_preference)
        .bind(&new.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(RegistryError::from_sqlx)
    }

    /// Fetches a team by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::TeamNotFound`] if no row exists, or
    /// [`RegistryError::Persistence`] on database failure.
    pub async fn get(&self, id: Uuid) -> Result<Team, RegistryError> {
        sqlx::query_as::<_, Team>("SELECT * FROM teams WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RegistryError::from_sqlx)?
            .ok_or(RegistryError::TeamNotFound(id))
    }

    /// Lists active (non-withdrawn) teams, optionally filtered by event.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on database failure.
    pub async fn list_active(
        &self,
        event_type: Option<EventType>,
    ) -> Result<Vec<Team>, RegistryError> {
        match event_type {
            Some(et) => sqlx::query_as::<_, Team>(
                "SELECT * FROM teams \
                 WHERE withdrawn_at IS NULL AND event_type = $1 \
                 ORDER BY created_at",
            )
            .bind(et)
            .fetch_all(&self.pool)
            .await
            .map_err(RegistryError::from_sqlx),
            None => sqlx::query_as::<_, Team>(
                "SELECT * FROM teams WHERE withdrawn_at IS NULL ORDER BY created_at",
            )
            .fetch_all(&self.pool)
            .await
            .map_err(RegistryError::from_sqlx),
        }
    }

    /// Marks a team withdrawn (soft delete). Idempotent: an already
    /// withdrawn team is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::TeamNotFound`] if no row exists, or
    /// [`RegistryError::Persistence`] on database failure.
    pub async fn withdraw(&self, id: Uuid) -> Result<Team, RegistryError> {
        let updated = sqlx::query_as::<_, Team>(
            "UPDATE teams SET withdrawn_at = NOW() \
             WHERE id = $1 AND withdrawn_at IS NULL RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RegistryError::from_sqlx)?;

        match updated {
            Some(team) => Ok(team),
            None => self.get(id).await,
        }
    }

    /// Hard-deletes a team and its roster links. Used only to clean up a
    /// team whose credit redemption lost the race.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on database failure.
    pub async fn delete(&self, id: Uuid) -> Result<(), RegistryError> {
        sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(RegistryError::from_sqlx)?;
        Ok(())
    }

    /// Adds a player to a team roster.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on database failure.
    pub async fn add_roster_member(
        &self,
        team_id: Uuid,
        player_id: Uuid,
        role: PlayerRole,
    ) -> Result<(), RegistryError> {
        sqlx::query(
            "INSERT INTO team_players (team_id, player_id, role) VALUES ($1, $2, $3) \
             ON CONFLICT (team_id, player_id) DO NOTHING",
        )
        .bind(team_id)
        .bind(player_id)
        .bind(role)
        .execute(&self.pool)
        .await
        .map_err(RegistryError::from_sqlx)?;
        Ok(())
    }

    /// Loads a team's roster with roles.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on database failure.
    pub async fn roster(&self, team_id: Uuid) -> Result<Vec<RosterMember>, RegistryError> {
        sqlx::query_as::<_, RosterMember>(
            "SELECT p.*, tp.role FROM team_players tp \
             JOIN players p ON p.id = tp.player_id \
             WHERE tp.team_id = $1 \
             ORDER BY p.last_name, p.first_name",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(RegistryError::from_sqlx)
    }
}
