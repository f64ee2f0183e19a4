//! qscan-ui - Roster sync and lookup service
//!
//! Imports a personnel roster, keeps a local cached copy reconciled against
//! a shared remote store (last write wins), and resolves scanned or typed
//! tokens to records. Serves the JSON API and SSE event stream the
//! presentation layer consumes.

use anyhow::Result;
use clap::Parser;
use qscan_common::config::{ConfigOverrides, ServiceConfig};
use qscan_ui::session::SessionController;
use qscan_ui::sync::RemoteStore;
use qscan_ui::{build_router, AppState};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "qscan-ui", about = "Roster sync and lookup service")]
struct Args {
    /// Data directory holding the local cache database
    #[arg(long, env = "QSCAN_DATA")]
    data_dir: Option<String>,

    /// HTTP bind address
    #[arg(long, env = "QSCAN_BIND")]
    bind: Option<String>,

    /// Remote sync resource URL
    #[arg(long, env = "QSCAN_SYNC_URL")]
    sync_url: Option<String>,

    /// Shared token for the admin gate (unset disables the gate)
    #[arg(long, env = "QSCAN_ADMIN_TOKEN")]
    admin_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber first
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting QSCAN roster service (qscan-ui) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = ServiceConfig::resolve(ConfigOverrides {
        data_dir: args.data_dir,
        bind_addr: args.bind,
        sync_url: args.sync_url,
        admin_token: args.admin_token,
    });

    config.ensure_data_dir()?;
    let db_path = config.database_path();
    info!("Cache database: {}", db_path.display());

    let pool = qscan_ui::db::open_or_create(&db_path).await?;
    info!("✓ Local cache ready");

    info!("Remote sync resource: {}", config.sync_url);
    let remote = RemoteStore::new(&config.sync_url)
        .map_err(|e| anyhow::anyhow!("Failed to build remote store client: {}", e))?;

    let session = SessionController::new(pool, remote);

    // Startup reconciliation: cached roster visible immediately, remote
    // fetch continues in the background
    let _reconcile = session.start().await?;
    let count = session.snapshot().await.record_count;
    info!("✓ Session started ({} cached records)", count);

    if config.admin_token.is_some() {
        info!("Admin gate enabled for roster mutations");
    } else {
        info!("Admin gate disabled (no token configured)");
    }

    let state = AppState::new(session, config.admin_token.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("qscan-ui listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
