//! REST API server for the lead dashboard
//!
//! Usage:
//!   ./target/release/api_server [--port PORT] [--config FILE] [--variant V]
//!
//! REST endpoints:
//!   GET    /                                 - Dashboard page
//!   GET    /api/v1/health                    - Health check
//!   POST   /api/v1/sessions                  - Upload CSV, open a session
//!   GET    /api/v1/sessions/:id              - Session summary
//!   DELETE /api/v1/sessions/:id              - Close a session
//!   PUT    /api/v1/sessions/:id/selection    - Set selected lead sources
//!   POST   /api/v1/sessions/:id/selection/all - Select every lead source
//!   PUT    /api/v1/sessions/:id/view         - Toggle the detail table
//!   GET    /api/v1/sessions/:id/dashboard    - All derived tables

use anyhow::Result;
use clap::Parser;
use lead_dashboard::api::{create_router, DashboardService};
use lead_dashboard::config::{DashboardConfig, Variant};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "api_server")]
#[command(about = "Serve the lead dashboard over HTTP")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value = "8080")]
    port: u16,

    /// JSON dashboard config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dashboard preset when no config file is given
    #[arg(long, default_value = "owner-funnel")]
    variant: Variant,
}

fn print_banner(port: u16, config: &DashboardConfig) {
    println!("============================================================");
    println!("              LEAD ANALYSIS DASHBOARD SERVER");
    println!("============================================================");
    println!();
    println!("  Port:       {}", port);
    println!("  Dashboard:  http://localhost:{}/", port);
    println!("  REST:       http://localhost:{}/api/v1/", port);
    println!("  Variant:    {:?}", config.variant);
    println!(
        "  Hierarchy:  {}",
        config
            .hierarchy_path
            .fields()
            .iter()
            .map(|f| f.header())
            .collect::<Vec<_>>()
            .join(" -> ")
    );
    println!();
    println!("============================================================");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::for_variant(args.variant),
    };

    print_banner(args.port, &config);

    let service = Arc::new(DashboardService::new(config));
    let app = create_router(service);

    let addr: SocketAddr = format!("0.0.0.0:{}", args.port).parse()?;
    tracing::info!("Starting REST server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
