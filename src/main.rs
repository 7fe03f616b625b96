use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agroclim_dashboard::{api, config::DashboardConfig, dashboard::Dashboard};

#[derive(Parser)]
#[command(name = "agroclim")]
#[command(about = "Interactive dashboard for 35 years of agricultural climate data")]
struct Cli {
    /// Daily climate CSV (overrides AGROCLIM_DATA)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Interface to listen on (overrides AGROCLIM_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port for the dashboard (overrides AGROCLIM_PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "agroclim_dashboard=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = DashboardConfig::from_env().with_overrides(cli.data, cli.host, cli.port);

    tracing::info!("Loading climate data from {}", config.data_path.display());
    let dashboard = Dashboard::open(&config.data_path);
    if !dashboard.is_ready() {
        tracing::warn!("Starting without data; every page will show the load error");
    }

    let app = api::create_router_with_config(dashboard, &config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Dashboard listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
