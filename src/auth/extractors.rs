use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use super::{cookie::ACCESS_TOKEN_COOKIE, repo::UserRepo, repo_types::PublicUser};
use crate::{error::AppError, state::AppState};

/// The authenticated caller, resolved from a verified token and a fresh user
/// lookup. Handlers that take this argument are protected routes.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub PublicUser);

/// Cookie first, then `Authorization: Bearer`. Blank values count as absent.
pub(crate) fn extract_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(ACCESS_TOKEN_COOKIE) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer ").or_else(|| v.strip_prefix("bearer ")))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers).ok_or_else(|| {
            AppError::Unauthenticated(
                "You are not logged in! Please log in to get access.".into(),
            )
        })?;

        let verified = state.keys.verify(&token).map_err(|e| {
            warn!(error = %e, "token rejected");
            AppError::from(e)
        })?;

        let user = state.users.find_by_id(verified.subject).await?.ok_or_else(|| {
            warn!(user_id = %verified.subject, "token subject no longer exists");
            AppError::Unauthenticated(
                "The user belonging to this token no longer exists.".into(),
            )
        })?;

        Ok(CurrentUser(user))
    }
}
