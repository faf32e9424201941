//! Logging setup

use tracing_subscriber::EnvFilter;

/// Level used when neither `RUST_LOG` nor the settings name one
pub const DEFAULT_LEVEL: &str = "debug";

/// Filter from `RUST_LOG` when set, otherwise from `level`
pub fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if level.trim().is_empty() { DEFAULT_LEVEL } else { level };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    })
}

/// Install the global subscriber writing to stderr.
///
/// Calling it again is a no-op.
pub fn setup(level: &str) {
    let installed = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter_for(level))
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("Logging initialised at {}", level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(filter_for("info").to_string(), "info");
        assert_eq!(filter_for("").to_string(), DEFAULT_LEVEL);
    }

    #[test]
    fn test_setup_twice() {
        setup("warn");
        setup("warn");
    }
}
