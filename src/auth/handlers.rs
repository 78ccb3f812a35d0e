use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        cookie::access_token_cookie,
        dto::{LoginRequest, LoginResponse, RegisterRequest, UserData, UserResponse},
        extractors::CurrentUser,
        repo::UserRepo,
        services,
    },
    error::AppError,
    extract::ApiJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    payload.normalize()?;

    let user = services::register(
        state.users.as_ref(),
        &payload.username,
        &payload.email,
        &payload.password,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::success(user))))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(mut payload): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    payload.normalize()?;

    let user = services::verify_credentials(state.users.as_ref(), &payload.email, &payload.password)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login rejected");
            AppError::Unauthenticated("Incorrect email or password".into())
        })?;

    let issued_at = OffsetDateTime::now_utc();
    let token = state.keys.sign_at(user.id, issued_at)?;
    let cookie = access_token_cookie(
        token.clone(),
        issued_at + state.keys.ttl(),
        state.config.environment,
    );

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            status: "success",
            token,
            data: UserData { user },
        }),
    ))
}

#[instrument(skip(state, current), fields(user_id = %current.0.id))]
pub async fn get_me(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .users
        .find_by_id(current.0.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User associated with this token not found.".into()))?;

    Ok(Json(UserResponse::success(user)))
}
