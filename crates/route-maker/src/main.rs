mod app;

use app::settings::Settings;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    let settings = Settings::parse();
    init_logging(settings.log.as_deref());

    if let Err(e) = app::run(settings) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

/// Log to stderr so GPX written to stdout stays clean
fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(filter) => EnvFilter::new(filter),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
