//! Request/response DTOs for the REST API.

pub mod common_dto;
pub mod player_dto;
pub mod registration_dto;
pub mod sponsor_dto;
pub mod team_dto;

pub use common_dto::{PaginationMeta, PaginationParams};
pub use player_dto::{PlayerListResponse, PlayerSearchParams, UpsertPlayerRequest};
pub use registration_dto::{
    CodeValidationResponse, OpenRegistrationRequest, PlayerEntryDto, RegistrationResponse,
    SponsorRegistrationRequest,
};
pub use sponsor_dto::{
    CreateSponsorRequest, CreateSponsorResponse, ResizeCreditsRequest, ResizeCreditsResponse,
    SendInviteRequest, SponsorDetailResponse,
};
pub use team_dto::{
    FlightStandingDto, FlightStandingsResponse, RosterMemberDto, TeamDetailResponse,
};
