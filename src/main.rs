use std::sync::Arc;

use anyhow::Context;

use catalog_api::auth::verifier;
use catalog_api::config::AppConfig;
use catalog_api::server::{self, AppState};
use catalog_api::storage::postgres::PgCatalogStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up DATABASE_URL and AUTH_*
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_api=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env().context("loading configuration")?;

    let store = PgCatalogStore::connect(&config.database)
        .await
        .context("connecting to PostgreSQL")?;
    sqlx::migrate!("./migrations")
        .run(store.pool())
        .await
        .context("applying schema migrations")?;
    tracing::info!("database schema is current");

    let verifier = verifier::from_config(&config.auth)
        .await
        .context("building token verifier")?;

    let state = AppState {
        store: Arc::new(store),
        verifier,
    };
    let app = server::router(state);

    let bind_addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!("catalog API listening on http://{bind_addr}");

    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
