use std::net::SocketAddr;

use agency_crm::{
    config::{Config, LogFormat},
    database::pool::{create_pool, run_migrations},
    routes, AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("agency_crm=info,tower_http=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let pool = create_pool(&config).await?;
    run_migrations(&pool).await?;
    info!("database migrations applied");

    let addr: SocketAddr = config.server_address.parse()?;
    if config.inbound_webhook_secret.is_none() {
        info!("inbound webhook signatures are not verified; set INBOUND_WEBHOOK_SECRET to enforce");
    }

    let app_state = AppState::new(pool, config)?;
    let app = routes::app(app_state);

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
