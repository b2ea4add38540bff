use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use runway_server::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("runway_server=debug,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(backend = config.backend_kind(), "starting runway server");

    runway_server::run_server(config).await
}
