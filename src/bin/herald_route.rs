//! Routes one request against a file of announcements and prints the result.
//!
//! Usage:
//!
//! ```text
//! herald_route [--config <path>] [--with-context] <announcements> <request>
//! ```
//!
//! The announcements file holds a JSON array of announcements, for example:
//!
//! ```json
//! [
//!   {
//!     "service_name": "Database Service",
//!     "capabilities": ["Show top players", "Sync tournaments"],
//!     "examples": ["db.ask('top 8')"]
//!   }
//! ]
//! ```
//!
//! The outcome is written to stdout as JSON. With `--with-context` the
//! dynamic context and assembled assistant prompt are included.

use camino::Utf8PathBuf;
use clap::Parser;
use herald::announcement::domain::Announcement;
use herald::config::{DiscoveryConfig, read_utf8_file};
use herald::hub::DiscoveryHub;
use serde_json::{Value, json};
use std::io::{self, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "herald_route", about = "Route a request against announced services")]
struct Args {
    /// TOML configuration file.
    #[arg(long, env = "HERALD_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Include the dynamic context and assistant prompt in the output.
    #[arg(long)]
    with_context: bool,

    /// JSON file holding an array of announcements.
    announcements: Utf8PathBuf,

    /// Free-text request to route.
    request: String,
}

fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let base = match args.config.as_deref() {
        Some(path) => DiscoveryConfig::load(path)?,
        None => DiscoveryConfig::default(),
    };
    let config = base.with_process_env()?;

    let announcements: Vec<Announcement> =
        serde_json::from_str(&read_utf8_file(&args.announcements)?)?;
    let hub = DiscoveryHub::start(config)?;
    for announcement in announcements {
        hub.bus().publish(announcement)?;
    }
    info!(
        services = hub.bus().list_services()?.len(),
        "announcements loaded"
    );

    let router = hub.router();
    let mut report = json!({
        "request": args.request.as_str(),
        "outcome": router.route_to_service(&args.request)?,
        "ranking": router.rank_services(&args.request)?,
    });
    if args.with_context
        && let Value::Object(fields) = &mut report
    {
        fields.insert("context".to_owned(), Value::String(router.dynamic_context()?));
        fields.insert(
            "prompt".to_owned(),
            Value::String(router.assistant_prompt(&args.request)?),
        );
    }

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string_pretty(&report)?)?;
    hub.shutdown()?;
    Ok(())
}
