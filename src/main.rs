use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use open_classrooms::api::router;
use open_classrooms::config::AppConfig;
use open_classrooms::gateway::{AvailabilityGateway, HttpGateway};
use open_classrooms::services::RefreshPoller;
use open_classrooms::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "open_classrooms=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;
    info!("proxying availability to {}", config.backend_base_url);

    let gateway: Arc<dyn AvailabilityGateway> = Arc::new(HttpGateway::new(&config)?);
    let state = AppState::new(&config, gateway.clone());

    if let Some(interval) = config.poll_interval {
        let poller = RefreshPoller::new(gateway, state.store.clone(), interval);
        tokio::spawn(poller.start());
    }

    let app = router(state);

    info!("listening on http://{}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
