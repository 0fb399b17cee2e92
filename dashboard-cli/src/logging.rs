use tracing_subscriber::EnvFilter;

/// Initialise logging to stderr.
///
/// Without `--debug` only warnings and errors are shown so the interactive
/// screen stays readable. With it the level is `debug` and `RUST_LOG` may
/// override it.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("warn")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
