//! Sponsor store: sponsor rows, packages, and the derived credits-used count.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Sponsor, SponsorshipPackage};
use crate::error::RegistryError;

/// Fields for inserting a new sponsor.
#[derive(Debug, Clone)]
pub struct NewSponsor {
    /// Event year the sponsorship belongs to.
    pub event_year_id: Uuid,
    /// Sponsor display name.
    pub name: String,
    /// Contact person name.
    pub contact_name: Option<String>,
    /// Contact email.
    pub contact_email: Option<String>,
    /// Purchased package, if any.
    pub package_id: Option<Uuid>,
    /// Free-text payment method.
    pub payment_method: Option<String>,
    /// Free-text payment status.
    pub payment_status: Option<String>,
    /// Initial credit pool size.
    pub total_credits: i32,
    /// Opaque capability token for sponsor self-service.
    pub access_token: String,
}

/// PostgreSQL-backed sponsor store.
#[derive(Debug, Clone)]
pub struct SponsorStore {
    pool: PgPool,
}

impl SponsorStore {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new sponsor row.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on database failure.
    pub async fn insert(&self, new: &NewSponsor) -> Result<Sponsor, RegistryError> {
        sqlx::query_as::<_, Sponsor>(
            "INSERT INTO sponsors \
             (event_year_id, name, contact_name, contact_email, package_id, \
              payment_method, payment_status, total_credits, access_token) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(new.event_year_id)
        .bind(&new.name)
        .bind(&new.contact_name)
        .bind(&new.contact_email)
        .bind(new.package_id)
        .bind(&new.payment_method)
        .bind(&new.payment_status)
        .bind(new.total_credits)
        .bind(&new.access_token)
        .fetch_one(&self.pool)
        .await
        .map_err(RegistryError::from_sqlx)
    }

    /// Fetches a sponsor by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SponsorNotFound`] if no row exists, or
    /// [`RegistryError::Persistence`] on database failure.
    pub async fn get(&self, id: Uuid) -> Result<Sponsor, RegistryError> {
        sqlx::query_as::<_, Sponsor>("SELECT * FROM sponsors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RegistryError::from_sqlx)?
            .ok_or_else(|| RegistryError::SponsorNotFound(id.to_string()))
    }

    /// Fetches a sponsor by its opaque access token.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SponsorNotFound`] if no row matches, or
    /// [`RegistryError::Persistence`] on database failure. The token itself
    /// is never echoed into the error.
    pub async fn get_by_token(&self, token: &str) -> Result<Sponsor, RegistryError> {
        sqlx::query_as::<_, Sponsor>("SELECT * FROM sponsors WHERE access_token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(RegistryError::from_sqlx)?
            .ok_or_else(|| RegistryError::SponsorNotFound("unknown access token".to_string()))
    }

    /// Lists all sponsors, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on database failure.
    pub async fn list(&self) -> Result<Vec<Sponsor>, RegistryError> {
        sqlx::query_as::<_, Sponsor>("SELECT * FROM sponsors ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(RegistryError::from_sqlx)
    }

    /// Counts redeemed credits for a sponsor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on database failure.
    pub async fn credits_used(&self, sponsor_id: Uuid) -> Result<i64, RegistryError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sponsor_credits \
             WHERE sponsor_id = $1 AND redeemed_by_team_id IS NOT NULL",
        )
        .bind(sponsor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(RegistryError::from_sqlx)
    }

    /// Fetches a sponsorship package by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Validation`] if no package exists, or
    /// [`RegistryError::Persistence`] on database failure.
    pub async fn package(&self, id: Uuid) -> Result<SponsorshipPackage, RegistryError> {
        sqlx::query_as::<_, SponsorshipPackage>(
            "SELECT * FROM sponsorship_packages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RegistryError::from_sqlx)?
        .ok_or_else(|| RegistryError::Validation(format!("unknown package: {id}")))
    }
}
