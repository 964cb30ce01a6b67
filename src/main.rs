//! Notes Server Entry Point
//!
//! Initializes logging, loads and validates configuration, builds the
//! configured stores, and serves HTTP until interrupted.

use anyhow::Result;
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

use notes_server::core::{Config, HttpTransport, ResourceServer};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging.level, config.logging.with_timestamps);

    info!("Starting {} v{}", config.server.name, config.server.version);

    // Refuse to start listening with an unusable configuration
    if let Err(e) = config.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    let server = ResourceServer::from_config(config.clone())?;
    server.seed().await?;

    info!("Server initialized");

    HttpTransport::new(config.http).run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Configures tracing with the specified log level and format.
fn init_logging(level: &str, with_timestamps: bool) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
