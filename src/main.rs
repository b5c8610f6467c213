use clap::Parser;
use magellan::config::Settings;
use magellan::{api, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "magellan-server",
    version,
    about = "Autonomous deep research server"
)]
struct Args {
    /// Path to the settings file (defaults to magellan.toml when present)
    #[arg(long, env = "MAGELLAN_CONFIG")]
    config: Option<String>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.server.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    std::fs::create_dir_all(&settings.server.output_dir)?;

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let state = AppState {
        server: Arc::new(settings.server),
        research_defaults: Arc::new(settings.research),
    };
    let app = api::routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "magellan server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
