use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// Priority: `RUST_LOG` > `--debug` > `[logging] level` from config.
pub fn init(debug_flag: bool, config_level: &str) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(config_level).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout carries the briefing in --stdout mode
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
