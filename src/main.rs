mod api;

use axum::Router;
use std::sync::Arc;
use stock_analyzer::config::Config;
use stock_analyzer::services::MarketDataService;
use stock_analyzer::sources::YahooFinanceClient;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub market_data: Arc<MarketDataService>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stock_analyzer=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env());
    info!("Starting stock analyzer on {}:{}", config.host, config.port);

    let yahoo = YahooFinanceClient::new(config.yahoo_base_url.clone(), config.http_timeout())?;
    let market_data = Arc::new(MarketDataService::new(
        Arc::new(yahoo),
        config.cache_ttl(),
        config.ticker_suffix.clone(),
        config.narrative_format(),
    ));
    info!(
        "Market data from {} (suffix {:?}, cache {}s)",
        config.yahoo_base_url, config.ticker_suffix, config.cache_ttl_secs
    );

    let state = AppState {
        config: config.clone(),
        market_data,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Stock analyzer listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
