use dotenvy::dotenv;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use webbeep_server::config::Config;
use webbeep_server::db::PgRepository;
use webbeep_server::routes::create_routes;
use webbeep_server::session::SessionStore;
use webbeep_server::state::{AppState, AuthSettings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("webbeep_server=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let repo = PgRepository::connect(config.database.connect_options()?, config.max_connections)
        .await?;
    tracing::info!("Successfully connected to database");

    repo.migrate().await?;
    tracing::info!("Migrations run successfully");

    let state = AppState::new(
        Arc::new(repo),
        SessionStore::new(config.session_ttl),
        AuthSettings::from(&config),
    );
    let app = create_routes(state, &config);

    tracing::info!("Server running at http://{}", config.bind_addr);
    let listener = TcpListener::bind(config.bind_addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}
