use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use quotabar::commands;
use quotabar::config::{Command, Config, Settings};
use quotabar::driver::Driver;
use quotabar_core::cache::FileCache;
use quotabar_core::config::ConfigStore;
use quotabar_core::usage::HttpUsageSource;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Config::parse_args();

    // Setup logging
    setup_logging(cli.debug);

    // Load settings
    let settings = Settings::load(&cli);
    let cache = FileCache::new(&settings.cache_dir);

    match &cli.command {
        Some(Command::Cycle { axis, direction }) => {
            let store = ConfigStore::new(&settings.config_path);
            let line = commands::cycle(*axis, *direction, &settings, &store, &cache)?;
            println!("{}", line);
        }
        Some(Command::ClearCache) => {
            println!("{}", commands::clear_cache(&cache)?);
        }
        None => {
            let source =
                HttpUsageSource::new(settings.endpoint.as_str(), settings.credentials_path.clone())
                    .with_timeout(Duration::from_secs(settings.fetch_timeout_secs));
            let driver = Driver::new(&cache, source, settings.render, settings.cache_ttl_secs)
                .with_cache(!cli.no_cache);
            println!("{}", driver.run(cli.format, Utc::now()));
        }
    }

    Ok(())
}

/// Log to stderr; stdout carries the status payload
fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("quotabar=debug,quotabar_core=debug")
    } else {
        EnvFilter::new("quotabar=warn,quotabar_core=warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
