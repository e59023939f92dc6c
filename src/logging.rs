use tracing_subscriber::EnvFilter;

/// Send library events to stderr so stdout stays clean JSON.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` picks debug over warn.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("repo_scraper={}", default_level)));

    // A second init (tests, embedding) is harmless; keep the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
