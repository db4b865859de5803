//! Sponsor endpoint DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::entities::{Sponsor, SponsorCredit};

/// Request body for registering a sponsor.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSponsorRequest {
    /// Event year the sponsorship belongs to.
    pub event_year_id: Uuid,
    /// Sponsor display name.
    pub name: String,
    /// Contact person name.
    #[serde(default)]
    pub contact_name: Option<String>,
    /// Contact email; the welcome email (with codes) goes here.
    #[serde(default)]
    pub contact_email: Option<String>,
    /// Purchased package; supplies the credit count unless
    /// `total_credits` is given.
    #[serde(default)]
    pub package_id: Option<Uuid>,
    /// Free-text payment method.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Free-text payment status.
    #[serde(default)]
    pub payment_status: Option<String>,
    /// Explicit credit pool size, overriding the package.
    #[serde(default)]
    pub total_credits: Option<i32>,
}

/// Response for sponsor creation: the row plus the issued codes.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateSponsorResponse {
    /// The created sponsor.
    #[serde(flatten)]
    pub sponsor: Sponsor,
    /// Redemption codes issued for the credit pool.
    pub codes: Vec<String>,
}

/// A sponsor with its credit pool, for admin and self-service views.
#[derive(Debug, Serialize, ToSchema)]
pub struct SponsorDetailResponse {
    /// The sponsor row.
    #[serde(flatten)]
    pub sponsor: Sponsor,
    /// Credits redeemed so far.
    pub credits_used: i64,
    /// Every credit in the pool, oldest first.
    pub credits: Vec<SponsorCredit>,
}

/// Request body for resizing a sponsor's credit pool.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResizeCreditsRequest {
    /// New total pool size.
    pub total_credits: i32,
}

/// Response for a pool resize.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResizeCreditsResponse {
    /// Pool size after the resize.
    pub total_credits: i32,
    /// Codes issued by a grow (empty when shrinking).
    pub new_codes: Vec<String>,
}

/// Request body for sending a captain-code invite.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SendInviteRequest {
    /// Captain email address to send the code to.
    pub email: String,
}
