use blog_api::{app, config::Environment, AppConfig, AppState};

fn init_tracing(env: Environment) {
    let default_filter = if env.is_production() {
        "blog_api=info,axum=info,tower_http=info"
    } else {
        "blog_api=debug,axum=info,tower_http=debug"
    };
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.environment);

    let (host, port) = (config.host.clone(), config.port);
    tracing::info!(environment = ?config.environment, "starting blog api");

    let state = AppState::init(config).await?;
    let app = app::build_app(state);

    app::serve(app, &host, port).await
}
