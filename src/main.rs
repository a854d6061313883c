use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use minicrm::db::CrmDb;
use minicrm::state::AppState;
use minicrm::{config, web};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("minicrm=info")),
        )
        .init();

    let db_path = config::db_path();
    let db = CrmDb::open_at(db_path.clone())
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;
    info!(path = %db_path.display(), "database ready");

    let state = Arc::new(AppState::new(db, db_path));
    let app = web::router(state);

    let addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
