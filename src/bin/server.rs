//! chapter-radar HTTP server
//!
//! Local and container entry point. Configuration comes from a TOML file,
//! with the listen address overridable from the command line or `PORT`/`HOST`.

use std::path::PathBuf;

use chapter_radar::{error::Result, models::Config, server};
use clap::Parser;

/// chapter-radar - latest-chapter feed
#[derive(Parser, Debug)]
#[command(name = "chapter-radar", version, about = "Latest-chapter feed server")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Listen port (overrides server.port)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Listen host (overrides server.host)
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the server.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("chapter-radar starting...");

    let mut config = Config::load_or_default(&cli.config);
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    log::info!(
        "Source {} (ttl {}s, {} retries), default watch: {}",
        config.source.url,
        config.cache.ttl_secs,
        config.source.retries,
        config.filter.default_watch.join(",")
    );

    server::serve(&config).await
}
