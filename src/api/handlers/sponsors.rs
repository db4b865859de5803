//! Sponsor handlers: admin management plus the token self-service view.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::auth::RequireAdmin;
use crate::api::dto::{
    CreateSponsorRequest, CreateSponsorResponse, ResizeCreditsRequest, ResizeCreditsResponse,
    SendInviteRequest, SponsorDetailResponse,
};
use crate::app_state::AppState;
use crate::domain::entities::Sponsor;
use crate::error::{ErrorResponse, RegistryError};
use crate::service::registration::SponsorSignup;

/// `POST /sponsors` — Register a sponsor (admin).
///
/// Issues the credit pool and fires the welcome email with the codes.
///
/// # Errors
///
/// Returns [`RegistryError::Validation`] on a blank name or unknown
/// package, or [`RegistryError::Persistence`] on database failure.
#[utoipa::path(
    post,
    path = "/api/v1/sponsors",
    tag = "Sponsors",
    summary = "Register a sponsor",
    description = "Creates the sponsor, issues its redemption codes, and emails them to the contact when one is on file.",
    request_body = CreateSponsorRequest,
    responses(
        (status = 201, description = "Sponsor created with codes", body = CreateSponsorResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
    )
)]
pub async fn create_sponsor(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateSponsorRequest>,
) -> Result<impl IntoResponse, RegistryError> {
    let (sponsor, codes) = state
        .registration
        .register_sponsor(SponsorSignup {
            event_year_id: req.event_year_id,
            name: req.name,
            contact_name: req.contact_name,
            contact_email: req.contact_email,
            package_id: req.package_id,
            payment_method: req.payment_method,
            payment_status: req.payment_status,
            total_credits: req.total_credits,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSponsorResponse { sponsor, codes }),
    ))
}

/// `GET /sponsors` — List sponsors (admin).
///
/// # Errors
///
/// Returns [`RegistryError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/sponsors",
    tag = "Sponsors",
    summary = "List sponsors",
    responses(
        (status = 200, description = "All sponsors, newest first", body = Vec<Sponsor>),
        (status = 401, description = "Not authorized", body = ErrorResponse),
    )
)]
pub async fn list_sponsors(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, RegistryError> {
    let sponsors = state.sponsors.list().await?;
    Ok(Json(sponsors))
}

/// `GET /sponsors/{id}` — Sponsor detail with credit pool (admin).
///
/// # Errors
///
/// Returns [`RegistryError::SponsorNotFound`] for an unknown id, or
/// [`RegistryError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/sponsors/{id}",
    tag = "Sponsors",
    summary = "Get sponsor details",
    params(
        ("id" = Uuid, Path, description = "Sponsor UUID"),
    ),
    responses(
        (status = 200, description = "Sponsor with credits", body = SponsorDetailResponse),
        (status = 404, description = "Sponsor not found", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
    )
)]
pub async fn get_sponsor(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, RegistryError> {
    let detail = sponsor_detail(&state, id).await?;
    Ok(Json(detail))
}

/// `GET /sponsors/by-token/{token}` — Sponsor self-service view.
///
/// The access token is a capability: knowing it grants the view. The
/// token is never echoed into error messages.
///
/// # Errors
///
/// Returns [`RegistryError::SponsorNotFound`] for an unknown token, or
/// [`RegistryError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/sponsors/by-token/{token}",
    tag = "Sponsors",
    summary = "Sponsor self-service lookup",
    params(
        ("token" = String, Path, description = "Sponsor access token"),
    ),
    responses(
        (status = 200, description = "Sponsor with credits", body = SponsorDetailResponse),
        (status = 404, description = "Unknown token", body = ErrorResponse),
    )
)]
pub async fn sponsor_by_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, RegistryError> {
    let sponsor = state.sponsors.get_by_token(&token).await?;
    let detail = sponsor_detail(&state, sponsor.id).await?;
    Ok(Json(detail))
}

/// `PUT /sponsors/{id}/credits` — Resize a sponsor's credit pool (admin).
///
/// # Errors
///
/// Returns [`RegistryError::SponsorNotFound`] for an unknown id,
/// [`RegistryError::CannotReduceBelowUsed`] when shrinking under the
/// redeemed count, or [`RegistryError::Persistence`] on database failure.
#[utoipa::path(
    put,
    path = "/api/v1/sponsors/{id}/credits",
    tag = "Sponsors",
    summary = "Resize credit pool",
    description = "Grows the pool with fresh codes or shrinks it by deleting unused credits; redeemed credits are never touched.",
    params(
        ("id" = Uuid, Path, description = "Sponsor UUID"),
    ),
    request_body = ResizeCreditsRequest,
    responses(
        (status = 200, description = "Pool resized", body = ResizeCreditsResponse),
        (status = 404, description = "Sponsor not found", body = ErrorResponse),
        (status = 422, description = "Below redeemed count", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
    )
)]
pub async fn resize_credits(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ResizeCreditsRequest>,
) -> Result<impl IntoResponse, RegistryError> {
    let new_codes = state.ledger.resize_pool(id, req.total_credits).await?;
    Ok(Json(ResizeCreditsResponse {
        total_credits: req.total_credits,
        new_codes,
    }))
}

/// `POST /sponsors/{id}/credits/{credit_id}/invite` — Email a captain
/// their code (admin).
///
/// Unlike the fire-and-forget registration emails, this send is the whole
/// point of the call, so a delivery failure is reported as an error and
/// `email_sent_at` is stamped only on success.
///
/// # Errors
///
/// Returns [`RegistryError::CreditNotFound`] when the credit does not
/// exist or belongs to another sponsor, [`RegistryError::Internal`] on
/// delivery failure, or [`RegistryError::Persistence`] on database
/// failure.
#[utoipa::path(
    post,
    path = "/api/v1/sponsors/{id}/credits/{credit_id}/invite",
    tag = "Sponsors",
    summary = "Send captain-code invite",
    params(
        ("id" = Uuid, Path, description = "Sponsor UUID"),
        ("credit_id" = Uuid, Path, description = "Credit UUID"),
    ),
    request_body = SendInviteRequest,
    responses(
        (status = 200, description = "Invite sent; updated credit", body = crate::domain::entities::SponsorCredit),
        (status = 404, description = "Credit not found", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
    )
)]
pub async fn send_invite(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path((id, credit_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<SendInviteRequest>,
) -> Result<impl IntoResponse, RegistryError> {
    let credit = state.ledger.store().get(credit_id).await?;
    if credit.sponsor_id != id {
        return Err(RegistryError::CreditNotFound(credit_id));
    }
    let sponsor = state.sponsors.get(id).await?;

    state
        .email
        .send_captain_code(&req.email, &sponsor.name, &credit.redemption_code)
        .await
        .map_err(|e| RegistryError::Internal(format!("invite email failed: {e}")))?;

    state.ledger.mark_invite_sent(credit_id).await?;
    let updated = state.ledger.store().get(credit_id).await?;
    Ok(Json(updated))
}

async fn sponsor_detail(
    state: &AppState,
    id: Uuid,
) -> Result<SponsorDetailResponse, RegistryError> {
    let sponsor = state.sponsors.get(id).await?;
    let credits_used = state.sponsors.credits_used(id).await?;
    let credits = state.ledger.store().list_for_sponsor(id).await?;
    Ok(SponsorDetailResponse {
        sponsor,
        credits_used,
        credits,
    })
}

/// Sponsor routes. Everything except the token lookup gates itself on
/// the admin cookie.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sponsors", post(create_sponsor).get(list_sponsors))
        .route("/sponsors/{id}", get(get_sponsor))
        .route("/sponsors/by-token/{token}", get(sponsor_by_token))
        .route("/sponsors/{id}/credits", put(resize_credits))
        .route(
            "/sponsors/{id}/credits/{credit_id}/invite",
            post(send_invite),
        )
}
