use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use post_optimizer::config::Config;
use post_optimizer::llm_client::LlmClient;
use post_optimizer::routes::build_router;
use post_optimizer::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let level = &config.rust_log;
            EnvFilter::new(format!("api={level},post_optimizer={level},tower_http={level}"))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Post Optimizer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::from_config(&config)?;
    match &llm {
        Some(llm) => info!(
            "LLM client initialized (provider: {}, model: {})",
            llm.provider_name(),
            llm.model()
        ),
        None => warn!(
            "{} is not set; gateway requests will fail with 500 until it is",
            config.provider.credential_var()
        ),
    }

    let state = AppState {
        llm,
        config: config.clone(),
    };

    // Browser front-ends call the gateways cross-origin.
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
