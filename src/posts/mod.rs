pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use repo::{PgPostRepo, PostRepo};
pub use repo_types::Post;

pub fn router() -> Router<AppState> {
    handlers::post_routes()
}
