//! Linkboard server entry point

use clap::Parser;
use tracing_subscriber::EnvFilter;

use linkboard::{App, AppState, RealCategoryStore, RealPageStore, RealSessionStore, RealUserStore};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "linkboard")]
#[command(about = "Categorized link directory web application")]
struct Args {
    /// Port for the HTTP server
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Bind host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Template directory
    #[arg(long, default_value = "./templates")]
    templates_dir: String,

    /// Static files directory
    #[arg(long, default_value = "./static")]
    static_dir: String,

    /// Session lifetime in seconds
    #[arg(long, default_value = "1209600")]
    session_ttl_secs: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let bind_address = format!("{}:{}", args.host, args.port).parse()?;
    let state = AppState::new(bind_address, &args.templates_dir, &args.static_dir)?;

    let app = App::new(
        state,
        RealCategoryStore::new(),
        RealPageStore::new(),
        RealUserStore::new(),
        RealSessionStore::new(chrono::Duration::seconds(args.session_ttl_secs)),
    );

    tracing::info!("linkboard starting on http://{bind_address}");
    app.run().await?;

    tracing::info!("linkboard stopped gracefully");
    Ok(())
}
