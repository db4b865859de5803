//! Service layer: business logic orchestration.
//!
//! [`CreditLedger`] owns the sponsor-credit lifecycle,
//! [`RegistrationService`] coordinates the register-a-team flows, and
//! [`EmailService`] / [`PlayerCache`] cover notifications and the
//! autocomplete cache.

pub mod credit_ledger;
pub mod email;
pub mod player_cache;
pub mod registration;

pub use credit_ledger::CreditLedger;
pub use email::EmailService;
pub use player_cache::PlayerCache;
pub use registration::RegistrationService;
