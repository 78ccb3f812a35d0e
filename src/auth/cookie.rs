use axum_extra::extract::cookie::{Cookie, SameSite};
use time::OffsetDateTime;

use crate::config::Environment;

pub const ACCESS_TOKEN_COOKIE: &str = "ACCESS_TOKEN";

/// HTTP-only auth cookie. Production gets `Secure` and `SameSite=Lax`;
/// everything else is sent insecure with `SameSite=None`.
pub fn access_token_cookie(
    token: String,
    expires_at: OffsetDateTime,
    env: Environment,
) -> Cookie<'static> {
    let same_site = if env.is_production() { SameSite::Lax } else { SameSite::None };
    Cookie::build((ACCESS_TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(env.is_production())
        .same_site(same_site)
        .expires(expires_at)
        .build()
}
