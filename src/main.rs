use std::sync::Arc;

use token_analyzer::api::{create_rest_router, AppState};
use token_analyzer::config::Config;
use token_analyzer::{Analyzer, Providers};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(worker_threads = 4)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,token_analyzer=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("\n🚀 Token Analyzer Starting...\n");

    let config = Config::load()?;
    tracing::info!("✓ Configuration loaded");
    if config.providers.helius_api_key.is_none() {
        tracing::warn!("HELIUS_API_KEY not set; Solana authority and activity lookups disabled");
    }
    if config.providers.holderscan_api_key.is_none() {
        tracing::warn!("HOLDERSCAN_API_KEY not set; holder counts disabled");
    }

    let providers = Providers::from_config(&config.providers)?;
    let state = Arc::new(AppState {
        analyzer: Analyzer::new(providers),
    });

    let app = create_rest_router(state, &config.server.static_dir);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    println!("\n✓ Server ready on http://{}\n", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
