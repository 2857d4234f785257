use std::env;
use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use treni::cache::{CacheConfig, CachedLookups};
use treni::stations::{
    DEFAULT_STATIONS_FILE, StationCache, StationCacheConfig, StationIndex, load_or_dump,
};
use treni::viaggiatreno::{DEFAULT_BASE_URL, ViaggiaTrenoClient, ViaggiaTrenoConfig};
use treni::web::{AppState, create_router};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_WEBAPP_DIR: &str = "webapp";

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    let base_url = env_or("VIAGGIATRENO_BASE_URL", DEFAULT_BASE_URL);
    let addr: SocketAddr = env_or("TRENI_ADDR", DEFAULT_ADDR)
        .parse()
        .expect("TRENI_ADDR must be host:port");
    let stations_file = env_or("TRENI_STATIONS_FILE", DEFAULT_STATIONS_FILE);
    let webapp_dir = env_or("TRENI_WEBAPP_DIR", DEFAULT_WEBAPP_DIR);

    let client = ViaggiaTrenoClient::new(ViaggiaTrenoConfig::new().with_base_url(&base_url))
        .expect("Failed to create ViaggiaTreno client");

    // The station list is needed for search, so fail fast without it
    let cache = StationCache::new(StationCacheConfig::new(&stations_file));
    let stations = load_or_dump(&client, &cache)
        .await
        .expect("Failed to load station list");
    tracing::info!(count = stations.len(), file = %stations_file, "Loaded stations");

    let lookups = CachedLookups::new(client, &CacheConfig::default());
    let state = AppState::new(lookups, StationIndex::new(stations));
    let app = create_router(state, &webapp_dir);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, upstream = %base_url, "treni-server listening");

    axum::serve(listener, app).await.expect("Server error");
}
