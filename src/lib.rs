//! # fairway-gateway
//!
//! Registration and sponsorship backend for an annual charity golf
//! tournament. Sponsors buy pools of team credits and hand out redemption
//! codes; captains self-register teams through code-gated endpoints;
//! players, rosters, handicaps, and the two-flight split are computed and
//! served over REST.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers + Admin Gate (api/)
//!     │
//!     ├── RegistrationService, CreditLedger (service/)
//!     ├── EmailService, PlayerCache (service/)
//!     │
//!     ├── Codes, Handicap, Flights (domain/)
//!     │
//!     └── PostgreSQL Stores (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
