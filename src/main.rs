use std::net::SocketAddr;
use std::time::Duration;

use jobboard_backend::{
    config::{Config, LogFormat, StorageBackend},
    database::{
        memory::MemoryRepository,
        pool::{create_pool, run_migrations},
        postgres::PgRepository,
        repository::Repositories,
    },
    routes, AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,tower_http=info,sqlx=warn";

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let repos = match config.storage {
        StorageBackend::Postgres => {
            let pool = create_pool(&config).await?;
            run_migrations(&pool).await?;
            Repositories::from_adapter(PgRepository::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on restart");
            Repositories::from_adapter(MemoryRepository::new())
        }
    };

    let addr: SocketAddr = config.server_address.parse()?;
    let purge_interval = Duration::from_secs(config.session_purge_interval_secs.max(1));
    let app_state = AppState::new(config, repos);

    {
        let auth = app_state.auth_service.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(purge_interval).await;
                match auth.purge_expired_sessions().await {
                    Ok(0) => {}
                    Ok(removed) => info!(removed, "purged expired sessions"),
                    Err(e) => tracing::error!(error = ?e, "session purge failed"),
                }
            }
        });
    }

    let app = routes::router(app_state)?;

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
