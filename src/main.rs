//! tally-server: HTTP service over companies, invoices, and industries

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tally::config::{Config, StorageBackend};
use tally::core::service::Store;
use tally::server::{AppState, build_router};
use tally::storage::{InMemoryStore, PostgresStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tally=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();

    let store: Arc<dyn Store> = match config.storage {
        StorageBackend::Memory => {
            info!("using in-memory storage, state is not persisted");
            Arc::new(InMemoryStore::new())
        }
        StorageBackend::Postgres => {
            info!("connecting to postgres");
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&config.database_url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            Arc::new(PostgresStore::new(pool))
        }
    };

    let app = build_router(AppState { store });

    let addr = config.listen_addr();
    info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
