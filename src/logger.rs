// File: src/logger.rs
use tracing_subscriber::EnvFilter;

const QUIET_FILTER: &str = "info";
const VERBOSE_FILTER: &str = "jihwa_core=debug,info";

/// Installs the global tracing subscriber on stderr, leaving stdout to the
/// kiosk screen. `RUST_LOG` wins over `verbose`; verbose also shows targets.
/// A second call is a no-op.
pub fn init_logger(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { QUIET_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_does_not_panic() {
        init_logger(true);
        init_logger(false);
        tracing::debug!("logger installed");
    }
}
