//! Domain layer: entities and the pure tournament computations.
//!
//! This module contains the registration domain model plus the pure,
//! deterministic core: redemption-code generation, handicap and GHIN
//! freshness math, and the flight split. Nothing here touches the
//! database or the network.

pub mod codes;
pub mod entities;
pub mod flight;
pub mod handicap;

pub use codes::CodeGenerator;
pub use entities::{EventType, Player, PlayerRole, Sponsor, SponsorCredit, Team, TeamPlayer};
pub use flight::{Flight, FlightEntry, assign_flights};
pub use handicap::GhinStatus;
