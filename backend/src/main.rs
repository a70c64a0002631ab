//! Weather Assistant - Backend Server
//!
//! Serves the forecast proxy and assistant API and delivers scheduled
//! prediction notifications.

use std::{net::SocketAddr, sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weather_assistant_backend::{
    clock::Clock, create_app, services::InMemoryPlatform, AppState, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "wxa_server=debug,weather_assistant_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Weather Assistant Server");
    tracing::info!("Environment: {}", config.environment);

    let poll = Duration::from_secs(config.notifications.delivery_poll_secs.max(1));
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::new(host, config.server.port);

    // Create application state
    let state = AppState::new(config)?;

    tokio::spawn(deliver_notifications(
        state.platform.clone(),
        state.clock.clone(),
        poll,
    ));

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Emit notifications as they fall due
async fn deliver_notifications(
    platform: Arc<InMemoryPlatform>,
    clock: Arc<dyn Clock>,
    every: Duration,
) {
    let mut interval = tokio::time::interval(every);
    loop {
        interval.tick().await;
        for due in platform.take_due(clock.now()) {
            tracing::info!(
                id = %due.id,
                kind = due.notification.metadata.kind.as_str(),
                title = %due.notification.title,
                body = %due.notification.body,
                "Delivering notification"
            );
        }
    }
}
