use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use veto_radio::{build_router, config::Config, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // LOG_FORMAT=json switches to structured output
    let json_logs = std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,veto_radio=debug,tower_http=info".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let db = db::connect(&config.database_url, 5).await?;
    tracing::info!("Connected to database");

    db::migrate(&db).await?;
    tracing::info!("Database migrations completed");

    let app_state = Arc::new(AppState::new(db, &config));

    app_state
        .radio_manager
        .load_radios(&config.radio_name)
        .await?;

    let app = build_router(app_state.clone(), &config);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
