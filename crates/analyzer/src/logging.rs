//! Logging setup

use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

/// Install the global fmt subscriber, writing to stderr.
///
/// Unknown levels fall back to `info`. A second call is a no-op.
pub fn init_logging(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        debug!("Tracing subscriber already installed");
    }
}
