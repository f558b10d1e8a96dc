//! Logging setup for the replay binary
//!
//! Logs go to stderr so stdout stays reserved for CSV output. The level comes
//! from `RUST_LOG` (default `warn`).

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// Calling it again after a subscriber is installed does nothing.
pub fn init(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // Err only means a subscriber is already installed
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init(false);
        init(true);
        tracing::warn!("still logging");
    }
}
