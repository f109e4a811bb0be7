use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

use utilisation_dashboard::modules::utilisation::adapters::outbound::teamweek_client::TeamweekClient;
use utilisation_dashboard::shared::core::clock::SystemClock;
use utilisation_dashboard::shared::infrastructure::json_store::file::JsonFileStore;
use utilisation_dashboard::shell::config::{DashboardOptions, ServerSettings};
use utilisation_dashboard::shell::http::router;
use utilisation_dashboard::shell::state::{AppState, Dependencies};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let settings = ServerSettings::from_env();
    let options = DashboardOptions::load(&settings.config_file)?;

    let state = AppState::new(
        Dependencies {
            planner: Arc::new(TeamweekClient::new(options.teamweek.clone())),
            cache_store: Arc::new(JsonFileStore::new(&settings.cache_file)),
            requirement_store: Arc::new(JsonFileStore::new(&settings.requirements_file)),
            clock: Arc::new(SystemClock),
        },
        &options,
    );

    let addr: SocketAddr = settings.addr.parse()?;
    tracing::info!(
        addr = %addr,
        cache_file = %settings.cache_file.display(),
        requirements_file = %settings.requirements_file.display(),
        "utilisation dashboard listening"
    );
    tracing::info!("GraphQL endpoint: http://{}/gql", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
