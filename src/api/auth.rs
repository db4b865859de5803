//! Admin authentication: shared-secret login and the route gate.
//!
//! There are no per-user accounts. `POST /admin/login` exchanges the
//! shared `ADMIN_PASSWORD` for an `HttpOnly` cookie carrying an opaque
//! per-process session token, and the [`RequireAdmin`] extractor checks
//! that cookie on every admin route. The password itself never
//! round-trips in the cookie, and a process restart invalidates all
//! admin sessions. An empty configured password disables admin access
//! entirely rather than accepting empty logins.

use axum::extract::{FromRequestParts, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::error::{ErrorResponse, RegistryError};

/// Cookie carrying the admin session token.
pub const ADMIN_COOKIE: &str = "fairway_admin";

/// Mints the opaque admin session token for this process.
///
/// Called once at startup; the value lands in
/// [`AppState::admin_token`](crate::app_state::AppState::admin_token)
/// and is what the admin cookie carries instead of the password.
#[must_use]
pub fn mint_admin_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Request body for admin login.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// The shared admin password.
    pub password: String,
}

/// `POST /admin/login` — Exchange the admin password for the admin cookie.
///
/// # Errors
///
/// Returns [`RegistryError::Unauthorized`] on a wrong (or unconfigured)
/// password.
#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "Admin",
    summary = "Admin login",
    description = "Exchanges the shared admin password for an HttpOnly session cookie.",
    request_body = LoginRequest,
    responses(
        (status = 204, description = "Logged in; cookie set"),
        (status = 401, description = "Wrong password", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, RegistryError> {
    let secret = &state.config.admin_password;
    if secret.is_empty() || req.password != *secret {
        return Err(RegistryError::Unauthorized);
    }

    let token = state.admin_token.as_str();
    let cookie = format!("{ADMIN_COOKIE}={token}; Path=/; HttpOnly; SameSite=Strict");
    let header = cookie
        .parse()
        .map_err(|_| RegistryError::Internal("invalid cookie header".to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, header);
    Ok((StatusCode::NO_CONTENT, headers))
}

/// Extractor gating a handler on the admin cookie.
///
/// Rejects with [`RegistryError::Unauthorized`] unless the request
/// carries the admin cookie matching the configured secret.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = RegistryError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let authorized = !state.config.admin_password.is_empty()
            && parts
                .headers
                .get(COOKIE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|cookies| {
                    cookie_value(cookies, ADMIN_COOKIE) == Some(state.admin_token.as_str())
                });

        if authorized {
            Ok(Self)
        } else {
            Err(RegistryError::Unauthorized)
        }
    }
}

/// Extracts a cookie value from a `Cookie` header string.
fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// Login route, mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new().route("/admin/login", post(login))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn cookie_value_finds_named_cookie() {
        let header = "theme=dark; fairway_admin=s3cret; lang=en";
        assert_eq!(cookie_value(header, ADMIN_COOKIE), Some("s3cret"));
    }

    #[test]
    fn cookie_value_misses_absent_cookie() {
        assert_eq!(cookie_value("theme=dark", ADMIN_COOKIE), None);
        assert_eq!(cookie_value("", ADMIN_COOKIE), None);
    }

    #[test]
    fn cookie_value_does_not_match_prefix_names() {
        let header = "fairway_admin_old=x";
        assert_eq!(cookie_value(header, ADMIN_COOKIE), None);
    }

    #[test]
    fn minted_tokens_are_opaque_and_distinct() {
        let password = "hunter2";
        let token = mint_admin_token();
        assert_eq!(token.len(), 32);
        assert_ne!(token, password);
        assert_ne!(token, mint_admin_token());
    }
}
