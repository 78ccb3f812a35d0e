use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{
        CreatePostRequest, Pagination, PostListResponse, PostResponse, PostsData,
        UpdatePostRequest,
    },
    repo::PostRepo,
    services,
};
use crate::{
    auth::CurrentUser,
    error::AppError,
    extract::{ApiJson, ApiQuery},
    state::AppState,
};

pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/:id",
            get(get_post).patch(update_post).delete(delete_post),
        )
}

// --- public ---

#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
    ApiQuery(p): ApiQuery<Pagination>,
) -> Result<Json<PostListResponse>, AppError> {
    let posts = state.posts.list(p.into_page()?).await?;
    Ok(Json(PostListResponse {
        status: "success",
        results: posts.len(),
        data: PostsData { posts },
    }))
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    let id = services::parse_post_id(&id)?;
    let post = services::get_post(state.posts.as_ref(), id).await?;
    Ok(Json(PostResponse::success(post)))
}

// --- authenticated ---

#[instrument(skip(state, user, payload), fields(user_id = %user.0.id))]
pub async fn create_post(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(mut payload): ApiJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    payload.normalize()?;
    let post =
        services::create_post(state.posts.as_ref(), &user.0, payload.title, payload.content)
            .await?;
    Ok((StatusCode::CREATED, Json(PostResponse::success(post))))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.0.id))]
pub async fn update_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let changes = payload.into_changes()?;
    let id = services::parse_post_id(&id)?;
    let post = services::update_post(state.posts.as_ref(), &user.0, id, changes).await?;
    Ok(Json(PostResponse::success(post)))
}

#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn delete_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = services::parse_post_id(&id)?;
    services::delete_post(state.posts.as_ref(), &user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
