use std::sync::Arc;

use crate::{
    auth::{self, JwtKeys, PgUserRepo, UserRepo},
    config::{AppConfig, ConfigError},
    db,
    memory::{MemoryPostRepo, MemoryUserRepo},
    posts::{PgPostRepo, PostRepo},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub users: Arc<dyn UserRepo>,
    pub posts: Arc<dyn PostRepo>,
}

impl AppState {
    /// Connects to Postgres and applies migrations. A failed migration is fatal.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        auth::services::prime_dummy_hash();
        let pool = db::connect(&config.database_url).await?;

        db::migrate(&pool).await?;
        tracing::info!("migrations applied");

        let users = Arc::new(PgUserRepo::new(pool.clone())) as Arc<dyn UserRepo>;
        let posts = Arc::new(PgPostRepo::new(pool)) as Arc<dyn PostRepo>;
        Ok(Self::from_parts(config, users, posts)?)
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserRepo>,
        posts: Arc<dyn PostRepo>,
    ) -> Result<Self, ConfigError> {
        let keys = JwtKeys::new(&config.jwt)?;
        Ok(Self {
            config: Arc::new(config),
            keys,
            users,
            posts,
        })
    }

    /// State backed by the in-memory repositories.
    pub fn in_memory(config: AppConfig) -> Result<Self, ConfigError> {
        Self::from_parts(
            config,
            Arc::new(MemoryUserRepo::default()),
            Arc::new(MemoryPostRepo::default()),
        )
    }
}
