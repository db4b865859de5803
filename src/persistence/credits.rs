//! Credit store: read paths for sponsor credits.
//!
//! The multi-statement lifecycle operations (redeem, restore, resize) are
//! owned by [`crate::service::CreditLedger`], which opens transactions on
//! the same pool — this store covers the single-statement paths.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::SponsorCredit;
use crate::error::RegistryError;

/// PostgreSQL-backed credit store.
#[derive(Debug, Clone)]
pub struct CreditStore {
    pool: PgPool,
}

impl CreditStore {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches a credit by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CreditNotFound`] if no row exists, or
    /// [`RegistryError::Persistence`] on database failure.
    pub async fn get(&self, id: Uuid) -> Result<SponsorCredit, RegistryError> {
        sqlx::query_as::<_, SponsorCredit>("SELECT * FROM sponsor_credits WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RegistryError::from_sqlx)?
            .ok_or(RegistryError::CreditNotFound(id))
    }

    /// Looks up a credit by its redemption code. Any string can be looked
    /// up; the generated format is not validated here.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on database failure.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<SponsorCredit>, RegistryError> {
        sqlx::query_as::<_, SponsorCredit>(
            "SELECT * FROM sponsor_credits WHERE redemption_code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(RegistryError::from_sqlx)
    }

    /// Lists a sponsor's credits, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on database failure.
    pub async fn list_for_sponsor(
        &self,
        sponsor_id: Uuid,
    ) -> Result<Vec<SponsorCredit>, RegistryError> {
        sqlx::query_as::<_, SponsorCredit>(
            "SELECT * FROM sponsor_credits WHERE sponsor_id = $1 ORDER BY created_at",
        )
        .bind(sponsor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(RegistryError::from_sqlx)
    }

    /// Stamps `email_sent_at` on a credit. Informational only; does not
    /// gate redemption.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CreditNotFound`] if no row exists, or
    /// [`RegistryError::Persistence`] on database failure.
    pub async fn mark_invite_sent(&self, id: Uuid) -> Result<(), RegistryError> {
        let result = sqlx::query("UPDATE sponsor_credits SET email_sent_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(RegistryError::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::CreditNotFound(id));
        }
        Ok(())
    }
}
