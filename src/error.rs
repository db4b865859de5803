//! Registry error types with HTTP status code mapping.
//!
//! [`RegistryError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2004,
///     "message": "code already used: FROG-2026-K7PD",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`RegistryError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status                  |
/// |-----------|------------------|------------------------------|
/// | 1000–1999 | Validation/Auth  | 400 Bad Request / 401        |
/// | 2000–2999 | Lookup/State     | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server           | 500 Internal Server Error    |
/// | 4000–4999 | Business Rule    | 422 Unprocessable Entity     |
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Required input was missing or malformed.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Admin cookie missing or does not match the configured secret.
    #[error("unauthorized")]
    Unauthorized,

    /// Redemption code does not exist.
    #[error("invalid redemption code: {0}")]
    InvalidCode(String),

    /// Redemption code has already been claimed by a team.
    #[error("code already used: {0}")]
    CodeAlreadyUsed(String),

    /// Friday is a sponsor-only event; open registration is unavailable.
    #[error("friday teams require a sponsor code")]
    FridayRequiresSponsor,

    /// Sponsor with the given ID or token was not found.
    #[error("sponsor not found: {0}")]
    SponsorNotFound(String),

    /// Player with the given ID was not found.
    #[error("player not found: {0}")]
    PlayerNotFound(uuid::Uuid),

    /// Team with the given ID was not found.
    #[error("team not found: {0}")]
    TeamNotFound(uuid::Uuid),

    /// Sponsor credit with the given ID was not found.
    #[error("credit not found: {0}")]
    CreditNotFound(uuid::Uuid),

    /// Pool resize would drop below the number of redeemed credits.
    #[error("cannot reduce credits below used count ({used} used, {requested} requested)")]
    CannotReduceBelowUsed {
        /// Credits already redeemed for the sponsor.
        used: i64,
        /// Requested new pool size.
        requested: i64,
    },

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RegistryError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::Unauthorized => 1401,
            Self::SponsorNotFound(_) => 2001,
            Self::PlayerNotFound(_) => 2002,
            Self::InvalidCode(_) => 2003,
            Self::CodeAlreadyUsed(_) => 2004,
            Self::TeamNotFound(_) => 2005,
            Self::CreditNotFound(_) => 2006,
            Self::FridayRequiresSponsor => 4001,
            Self::CannotReduceBelowUsed { .. } => 4002,
            Self::Persistence(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::SponsorNotFound(_)
            | Self::PlayerNotFound(_)
            | Self::InvalidCode(_)
            | Self::TeamNotFound(_)
            | Self::CreditNotFound(_) => StatusCode::NOT_FOUND,
            Self::CodeAlreadyUsed(_) => StatusCode::CONFLICT,
            Self::FridayRequiresSponsor | Self::CannotReduceBelowUsed { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wraps a database error in [`RegistryError::Persistence`].
    #[must_use]
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_categories() {
        assert_eq!(
            RegistryError::Validation("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RegistryError::InvalidCode("FROG-2026-AAAA".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RegistryError::CodeAlreadyUsed("FROG-2026-AAAA".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            RegistryError::FridayRequiresSponsor.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            RegistryError::CannotReduceBelowUsed {
                used: 3,
                requested: 2
            }
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            RegistryError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            RegistryError::Persistence("down".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(RegistryError::Validation("x".to_string()).error_code(), 1001);
        assert_eq!(
            RegistryError::CodeAlreadyUsed("c".to_string()).error_code(),
            2004
        );
        assert_eq!(RegistryError::FridayRequiresSponsor.error_code(), 4001);
        assert_eq!(
            RegistryError::CannotReduceBelowUsed {
                used: 3,
                requested: 2
            }
            .error_code(),
            4002
        );
    }

    #[test]
    fn reduce_below_used_message_carries_counts() {
        let err = RegistryError::CannotReduceBelowUsed {
            used: 3,
            requested: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("3 used"));
        assert!(msg.contains("2 requested"));
    }
}
