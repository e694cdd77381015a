use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

use skydash::app::App;
use skydash::build_info;
use skydash::config::AppConfig;
use skydash::health;

/// Tap-to-dash action prototype
#[derive(Debug, Parser)]
#[command(name = "skydash", version, about)]
struct Args {
    /// Run the startup health checks, print a report and exit
    #[arg(long)]
    health: bool,

    /// Config profile to load (defaults to APP_PROFILE, then "release")
    #[arg(long)]
    profile: Option<String>,

    /// Binding context to start in: world, battle or map
    #[arg(long)]
    context: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.health {
        let report = health::run_all_checks();
        health::print_report(&report);
        std::process::exit(report.exit_code());
    }

    info!(version = %build_info::version_string(), "Launching");

    let loaded = match &args.profile {
        Some(profile) => AppConfig::load(profile),
        None => AppConfig::load_from_env(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using default configuration");
        AppConfig::default()
    });
    if let Some(context) = args.context {
        config.input.context = context;
    }

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop
        .run_app(&mut app)
        .context("Failed to run event loop")?;

    Ok(())
}
