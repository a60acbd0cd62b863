use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use server::build_router;
use server::config::AppConfig;
use server::database::init_db;
use server::seed;
use server::state::AppState;
use server::storage::filesystem::FilesystemBlobStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database.url)
        .await
        .context("Failed to connect to the database")?;
    seed::seed_group_permissions(&db)
        .await
        .context("Failed to seed group permissions")?;
    seed::ensure_indexes(&db)
        .await
        .context("Failed to ensure database indexes")?;

    let blob_store = FilesystemBlobStore::new(
        config.storage.uploads_dir.clone(),
        config.storage.max_upload_size,
    )
    .await
    .context("Failed to initialize upload storage")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        config,
        blob_store: Arc::new(blob_store),
    };

    let app = build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
