//! Registration handlers: code validation and the two registration flows.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    CodeValidationResponse, OpenRegistrationRequest, RegistrationResponse,
    SponsorRegistrationRequest,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, RegistryError};

/// `GET /codes/{code}` — Validate a redemption code.
///
/// Lets the registration form check a code before the captain fills in a
/// roster. Passing here does not hold the code; the registration itself
/// still races.
///
/// # Errors
///
/// Returns [`RegistryError::InvalidCode`] for an unknown code,
/// [`RegistryError::CodeAlreadyUsed`] for a claimed one, or
/// [`RegistryError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/codes/{code}",
    tag = "Registration",
    summary = "Validate a redemption code",
    params(
        ("code" = String, Path, description = "Redemption code"),
    ),
    responses(
        (status = 200, description = "Code is available", body = CodeValidationResponse),
        (status = 404, description = "Unknown code", body = ErrorResponse),
        (status = 409, description = "Code already used", body = ErrorResponse),
    )
)]
pub async fn validate_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, RegistryError> {
    let credit = state.ledger.validate_and_reserve(&code).await?;
    let sponsor = state.sponsors.get(credit.sponsor_id).await?;
    Ok(Json(CodeValidationResponse {
        code: credit.redemption_code,
        sponsor_name: sponsor.name,
        valid: true,
    }))
}

/// `POST /registrations/open` — Open (self-pay) registration.
///
/// # Errors
///
/// Returns [`RegistryError::FridayRequiresSponsor`] for the sponsor-only
/// Friday event, [`RegistryError::Validation`] on bad input, or
/// [`RegistryError::Persistence`] on database failure.
#[utoipa::path(
    post,
    path = "/api/v1/registrations/open",
    tag = "Registration",
    summary = "Open registration",
    description = "Registers a self-paying team. No payment is processed; the chosen method is recorded for reconciliation.",
    request_body = OpenRegistrationRequest,
    responses(
        (status = 201, description = "Team registered", body = RegistrationResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 422, description = "Friday requires a sponsor code", body = ErrorResponse),
    )
)]
pub async fn register_open(
    State(state): State<AppState>,
    Json(req): Json<OpenRegistrationRequest>,
) -> Result<impl IntoResponse, RegistryError> {
    let team_id = state.registration.register_open(req.into()).await?;
    state.player_cache.invalidate().await;
    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse {
            team_id,
            sponsor_name: None,
        }),
    ))
}

/// `POST /registrations/sponsor` — Code-gated registration.
///
/// # Errors
///
/// Returns [`RegistryError::InvalidCode`] /
/// [`RegistryError::CodeAlreadyUsed`] for a bad code,
/// [`RegistryError::Validation`] on bad input, or
/// [`RegistryError::Persistence`] on database failure.
#[utoipa::path(
    post,
    path = "/api/v1/registrations/sponsor",
    tag = "Registration",
    summary = "Sponsor-code registration",
    description = "Registers a team against a sponsor redemption code, consuming one credit.",
    request_body = SponsorRegistrationRequest,
    responses(
        (status = 201, description = "Team registered", body = RegistrationResponse),
        (status = 404, description = "Unknown code", body = ErrorResponse),
        (status = 409, description = "Code already used", body = ErrorResponse),
    )
)]
pub async fn register_sponsor_code(
    State(state): State<AppState>,
    Json(req): Json<SponsorRegistrationRequest>,
) -> Result<impl IntoResponse, RegistryError> {
    let code = req.code.clone();
    let (team_id, sponsor_name) = state
        .registration
        .register_with_code(req.into(), &code)
        .await?;
    state.player_cache.invalidate().await;
    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse {
            team_id,
            sponsor_name: Some(sponsor_name),
        }),
    ))
}

/// Registration routes, all public.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/codes/{code}", get(validate_code))
        .route("/registrations/open", post(register_open))
        .route("/registrations/sponsor", post(register_sponsor_code))
}
