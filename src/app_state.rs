//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::RegistryConfig;
use crate::persistence::{PlayerStore, SponsorStore, TeamStore};
use crate::service::{CreditLedger, EmailService, PlayerCache, RegistrationService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Service configuration (admin secret, code prefix, …).
    pub config: Arc<RegistryConfig>,
    /// Opaque per-process admin session token; the admin cookie carries
    /// this, never the password itself.
    pub admin_token: Arc<String>,
    /// Player store for direct CRUD paths.
    pub players: PlayerStore,
    /// Team store for direct read paths.
    pub teams: TeamStore,
    /// Sponsor store for direct read paths.
    pub sponsors: SponsorStore,
    /// Credit ledger for issuance, resize, and invite stamping.
    pub ledger: CreditLedger,
    /// Registration orchestrator.
    pub registration: Arc<RegistrationService>,
    /// Outbound email.
    pub email: EmailService,
    /// TTL'd cache backing the player autocomplete list.
    pub player_cache: Arc<PlayerCache>,
}
