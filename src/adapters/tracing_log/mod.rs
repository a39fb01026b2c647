// Tracing log adapter - Structured logging using tracing crate

use tracing_subscriber::EnvFilter;

/// Log levels accepted on the command line and in config files
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Build the filter: `RUST_LOG` wins, otherwise `level` for this crate and
/// `warn` for everything else.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

fn default_directives(level: &str) -> String {
    let level = if LOG_LEVELS.contains(&level) { level } else { "info" };
    format!("warn,quietcut={}", level)
}

/// Install the global subscriber, writing to stderr so stdout stays free for
/// command output. A second call is a no-op.
pub fn init_logging(level: &str, json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false);

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
    fn test_unknown_level_falls_back_to_info() {
        assert_eq!(default_directives("loud"), "warn,quietcut=info");
        assert_eq!(default_directives("debug"), "warn,quietcut=debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging("info", false);
        init_logging("debug", true);
    }
}
