//! Persistence layer: PostgreSQL stores for the registration tables.
//!
//! One store struct per aggregate, each wrapping a shared `sqlx::PgPool`.
//! Queries are plain `sqlx::query_as` with bound parameters; every database
//! failure is mapped into [`RegistryError::Persistence`]. Multi-statement
//! invariants (credit redemption, pool resize) are owned by the credit
//! ledger in the service layer, which opens transactions on the same pool.

pub mod credits;
pub mod players;
pub mod sponsors;
pub mod teams;

pub use credits::CreditStore;
pub use players::PlayerStore;
pub use sponsors::SponsorStore;
pub use teams::TeamStore;

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::RegistryConfig;
use crate::error::RegistryError;

/// Embedded migrations applied at startup.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Connects to PostgreSQL and applies pending migrations.
///
/// # Errors
///
/// Returns [`RegistryError::Persistence`] if the pool cannot be created
/// or a migration fails.
pub async fn connect(config: &RegistryConfig) -> Result<PgPool, RegistryError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await
        .map_err(RegistryError::from_sqlx)?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|e| RegistryError::Persistence(e.to_string()))?;

    Ok(pool)
}
