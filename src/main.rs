//! Lead dashboard report
//!
//! Run: ./target/release/lead_dashboard --input leads.csv [--source Web]...

use anyhow::{Context, Result};
use clap::Parser;
use lead_dashboard::config::{DashboardConfig, Variant};
use lead_dashboard::dashboard::DetailView;
use lead_dashboard::loader::load_leads_from_path;
use lead_dashboard::pipeline::HierarchyPath;
use lead_dashboard::report::render_dashboard;
use lead_dashboard::session::Session;
use std::path::PathBuf;
use tracing::info;

const DEFAULT_LOG_FILTER: &str = "info";

/// `RUST_LOG` when set, otherwise `info`. Logs go to stderr so `--json` output stays clean.
fn log_filter(rust_log: Option<String>) -> String {
    rust_log.unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

#[derive(Parser, Debug)]
#[command(name = "lead_dashboard")]
#[command(about = "Aggregate a lead CSV into dashboard tables")]
struct Args {
    /// Lead CSV to analyse
    #[arg(short, long)]
    input: PathBuf,

    /// Lead Source to include (repeatable, default: all)
    #[arg(short, long = "source")]
    sources: Vec<String>,

    /// Dashboard preset: owner-funnel or lead-type-mix
    #[arg(long, default_value = "owner-funnel")]
    variant: Variant,

    /// JSON dashboard config (overrides --variant)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the hierarchy path, e.g. "group,lead_type,owner"
    #[arg(long)]
    hierarchy: Option<String>,

    /// Show hierarchical value counts instead of the filtered rows
    #[arg(long)]
    hierarchical_counts: bool,

    /// Print the dashboard as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::for_variant(args.variant),
    };
    if let Some(path) = &args.hierarchy {
        config.hierarchy_path = HierarchyPath::parse(path)?;
    }

    let leads = load_leads_from_path(&args.input)
        .with_context(|| format!("loading leads from {:?}", args.input))?;

    let mut session = Session::new(leads);
    if !args.sources.is_empty() {
        session.set_selection(args.sources.iter().cloned());
    }
    if args.hierarchical_counts {
        session.set_detail_view(DetailView::HierarchicalCounts);
    }

    let dashboard = session.dashboard(&config);
    info!("Dashboard covers {} of {} leads", dashboard.filtered_leads, dashboard.total_leads);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        print!("{}", render_dashboard(&dashboard));
    }
    Ok(())
}
