//! Logging setup for the `argbind` binary.
//!
//! Logs go to stderr so command output on stdout stays clean.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Filter used when neither `--log` nor `ARGBIND_LOG` is set.
pub const DEFAULT_FILTER: &str = "warn";

/// Builds the filter: `verbose` forces `debug`, otherwise the given
/// directives, falling back to [`DEFAULT_FILTER`] when absent or invalid.
pub fn build_filter(directives: Option<&str>, verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    match directives {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|err| {
            eprintln!("Warning: ignoring invalid log filter '{directives}': {err}");
            EnvFilter::new(DEFAULT_FILTER)
        }),
        None => EnvFilter::new(DEFAULT_FILTER),
    }
}

/// Initializes stderr logging.
pub fn init_stderr_logging(directives: Option<&str>, verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(directives, verbose))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_wins_over_directives() {
        assert_eq!(build_filter(Some("error"), true).to_string(), "debug");
    }

    #[test]
    fn test_default_filter() {
        assert_eq!(build_filter(None, false).to_string(), DEFAULT_FILTER);
    }

    #[test]
    fn test_directives_are_used() {
        assert_eq!(
            build_filter(Some("argbind_core=trace"), false).to_string(),
            "argbind_core=trace"
        );
    }
}
