use orbview_stub::catalog::Catalog;
use orbview_stub::config::StubConfig;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    // Load configuration
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = if Path::new(&config_path).exists() {
        StubConfig::load(&config_path)?
    } else {
        info!("{} not found, serving built-in fixtures", config_path);
        StubConfig::default()
    };
    info!(
        "Loaded {} satellite fixtures, {} visible pairs",
        config.satellites.len(),
        config.visible_pairs.len()
    );

    let catalog = Arc::new(Catalog::from_config(&config));

    let mut app = orbview_stub::router(catalog).layer(TraceLayer::new_for_http());
    if config.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    let addr = if config.bind_all {
        SocketAddr::from(([0, 0, 0, 0], config.port))
    } else {
        SocketAddr::from(([127, 0, 0, 1], config.port))
    };
    info!("Starting satellite stub service on http://{}", addr);
    info!("Client base_url: http://{}/api", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
