//! Logging utilities

pub use log::{debug, info, warn, error, trace, LevelFilter};

/// Initialize the logging system at the given default level
///
/// Module specific `RUST_LOG` directives are still honoured on top of the
/// default level. Calling this more than once is harmless; later calls are ignored.
pub fn init(level: LevelFilter) {
    if env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init()
        .is_err()
    {
        log::debug!("Logger already initialized, keeping existing configuration");
    }
}

/// Parse a textual log level ("info", "debug", ...), falling back to `Info`
pub fn parse_level(level: &str) -> LevelFilter {
    level.parse().unwrap_or_else(|_| {
        log::warn!("Unknown log level '{}', defaulting to info", level);
        LevelFilter::Info
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level("TRACE"), LevelFilter::Trace);
        assert_eq!(parse_level("loud"), LevelFilter::Info);
    }
}
