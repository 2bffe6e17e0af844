use tracing_subscriber::{fmt, EnvFilter};

/// Installs the stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks the level, starting
/// at `warn`. stdout is left to the envelope.
pub fn init(verbose: u8) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
