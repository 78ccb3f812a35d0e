use crate::state::AppState;
use axum::Router;

mod claims;
pub mod cookie;
pub mod dto;
pub mod extractors;
pub mod guard;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use extractors::CurrentUser;
pub use jwt::{JwtKeys, TokenError};
pub use repo::{PgUserRepo, UserRepo};
pub use repo_types::PublicUser;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
