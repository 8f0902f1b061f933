//! Safety Check CLI
//!
//! Runs one interactive safety session on the terminal.
//!
//! Usage:
//!   safety-check --config config/safety-check.example.json
//!   safety-check --offline --alert-url https://example.test/alerts.json

use alert_dispatch::{AlertDispatcher, HttpAlertSink, LogNotifier};
use anyhow::{Context, Result};
use clap::Parser;
use safety_check::{
    run_session, AppConfig, Console, FixedLocation, IpApiLocator, LocationProvider, SafetyCheck,
};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Overrides the alert endpoint when `--alert-url` is not given
const ALERT_URL_ENV: &str = "SAFETY_ALERT_URL";

#[derive(Parser, Debug)]
#[command(
    name = "safety-check",
    about = "Check your position against danger zones and raise an SOS alert"
)]
struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Alert store endpoint (overrides config and SAFETY_ALERT_URL)
    #[arg(long)]
    alert_url: Option<String>,

    /// Use a fixed latitude instead of the location provider
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Use a fixed longitude instead of the location provider
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Label for the fixed location
    #[arg(long, default_value = "Fixed Location")]
    label: String,

    /// Skip the network lookup and use the fallback location
    #[arg(long)]
    offline: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so they never interleave with the prompts on stdout
    let default_filter = if args.verbose {
        "safety_check=debug,alert_dispatch=debug,geofence=debug"
    } else {
        "safety_check=info,alert_dispatch=info,geofence=info"
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    if let Some(url) = args.alert_url.clone() {
        config.alert_endpoint = url;
    } else if let Ok(url) = std::env::var(ALERT_URL_ENV) {
        config.alert_endpoint = url;
    }
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        config.fixed_location = Some(safety_check::config::FixConfig {
            lat,
            lon,
            label: args.label.clone(),
        });
    }
    config.validate()?;

    let registry = config.registry()?;
    let fallback = config.fallback_fix()?;
    info!(
        "{} danger zones, {} trusted contacts, alerts to {}",
        registry.len(),
        config.contacts.len(),
        config.alert_endpoint
    );

    let sink = HttpAlertSink::new(
        config.alert_endpoint.clone(),
        Duration::from_secs(config.submit_timeout_sec),
    )
    .context("creating alert client")?;
    let dispatcher = AlertDispatcher::new(sink, LogNotifier::new(), config.contacts.clone());
    let check = SafetyCheck::new(registry, dispatcher);

    let provider: Box<dyn LocationProvider> = if args.offline {
        Box::new(FixedLocation::new(fallback.clone()))
    } else if let Some(fix) = config.fixed_fix()? {
        Box::new(FixedLocation::new(fix))
    } else {
        Box::new(
            IpApiLocator::new(
                config.location.provider_url.clone(),
                Duration::from_secs(config.location.timeout_sec),
            )
            .context("creating location client")?,
        )
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());

    let report = run_session(&check, provider.as_ref(), &fallback, &mut console)?;
    info!(
        "Session finished for {}: {:?}",
        report.user,
        report.decision
    );

    Ok(())
}
