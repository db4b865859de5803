//! Player store: CRUD plus the GHIN backfill rule.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{GHIN_NONE, Player};
use crate::error::RegistryError;

/// Fields for inserting a new player.
#[derive(Debug, Clone)]
pub struct NewPlayer {
    /// First name (already trimmed).
    pub first_name: String,
    /// Last name (already trimmed).
    pub last_name: String,
    /// Name suffix.
    pub suffix: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// GHIN id; defaults to the `NONE` sentinel when absent.
    pub ghin: Option<String>,
    /// Raw handicap index.
    pub handicap_raw: Option<f64>,
    /// Forward-tee flag.
    pub plays_forward_tees: bool,
}

/// PostgreSQL-backed player store.
#[derive(Debug, Clone)]
pub struct PlayerStore {
    pool: PgPool,
}

impl PlayerStore {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new player row.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on database failure.
    pub async fn insert(&self, new: &NewPlayer) -> Result<Player, RegistryError> {
        let ghin = new
            .ghin
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .unwrap_or(GHIN_NONE);

        sqlx::query_as::<_, Player>(
            "INSERT INTO players \
             (first_name, last_name, suffix, email, phone, ghin, handicap_raw, plays_forward_tees) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.suffix)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(ghin)
        .bind(new.handicap_raw)
        .bind(new.plays_forward_tees)
        .fetch_one(&self.pool)
        .await
        .map_err(RegistryError::from_sqlx)
    }

    /// Fetches a player by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PlayerNotFound`] if no row exists, or
    /// [`RegistryError::Persistence`] on database failure.
    pub async fn get(&self, id: Uuid) -> Result<Player, RegistryError> {
        sqlx::query_as::<_, Player>("SELECT * FROM players WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RegistryError::from_sqlx)?
            .ok_or(RegistryError::PlayerNotFound(id))
    }

    /// Lists all players ordered by last then first name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on database failure.
    pub async fn list(&self) -> Result<Vec<Player>, RegistryError> {
        sqlx::query_as::<_, Player>("SELECT * FROM players ORDER BY last_name, first_name")
            .fetch_all(&self.pool)
            .await
            .map_err(RegistryError::from_sqlx)
    }

    /// Updates a player's identity and golf attributes.
    ///
    /// A handicap change also stamps `last_handicap_update_at`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PlayerNotFound`] if no row exists, or
    /// [`RegistryError::Persistence`] on database failure.
    pub async fn update(&self, id: Uuid, update: &NewPlayer) -> Result<Player, RegistryError> {
        let ghin = update
            .ghin
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .unwrap_or(GHIN_NONE);

        sqlx::query_as::<_, Player>(
            "UPDATE players SET \
             first_name = $2, last_name = $3, suffix = $4, email = $5, phone = $6, \
             ghin = $7, plays_forward_tees = $8, \
             last_handicap_update_at = CASE \
                 WHEN handicap_raw IS DISTINCT FROM $9 THEN NOW() \
                 ELSE last_handicap_update_at END, \
             handicap_raw = $9 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.suffix)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(ghin)
        .bind(update.plays_forward_tees)
        .bind(update.handicap_raw)
        .fetch_optional(&self.pool)
        .await
        .map_err(RegistryError::from_sqlx)?
        .ok_or(RegistryError::PlayerNotFound(id))
    }

    /// Backfills a GHIN id onto a player that has none on file.
    ///
    /// The update only applies while the stored GHIN is null or the `NONE`
    /// sentinel — a real GHIN is never overwritten. A no-op when the
    /// condition does not hold.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on database failure.
    pub async fn backfill_ghin(&self, id: Uuid, ghin: &str) -> Result<(), RegistryError> {
        sqlx::query(
            "UPDATE players SET ghin = $2 \
             WHERE id = $1 AND (ghin IS NULL OR ghin = $3)",
        )
        .bind(id)
        .bind(ghin)
        .bind(GHIN_NONE)
        .execute(&self.pool)
        .await
        .map_err(RegistryError::from_sqlx)?;
        Ok(())
    }

    /// Hard-deletes a player; team-roster links cascade.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PlayerNotFound`] if no row exists, or
    /// [`RegistryError::Persistence`] on database failure.
    pub async fn delete(&self, id: Uuid) -> Result<(), RegistryError> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(RegistryError::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::PlayerNotFound(id));
        }
        Ok(())
    }
}
