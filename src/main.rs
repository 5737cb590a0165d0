use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use academy_feed::{app, build_feed, config::Config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);

    let feed = build_feed(&config)?;
    info!(
        "Announcements upstream: {} (window {} months, timeout {:?})",
        feed.url(),
        config.window_months,
        config.http_timeout
    );

    let state = AppState {
        feed,
        config: config.clone(),
    };

    let addr = format!("{}:{}", config.host, config.port);
    info!("academy-feed API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
