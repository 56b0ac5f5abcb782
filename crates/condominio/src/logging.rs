//! Tracing setup for the `condo` binary.
//!
//! Storage failures that the persistence service swallows, feed errors and
//! backend requests are only visible through these logs, so they go to
//! stderr and leave stdout to command output (`--format json` included).

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Targets that follow the `-q`/`-v` flags: the library and the binary.
const OWN_TARGETS: [&str; 2] = ["condominio", "condo"];

/// HTTP stack targets, only opened up at trace verbosity.
const HTTP_TARGETS: [&str; 3] = ["axum", "hyper", "reqwest"];

/// How much the CLI logs, from `-q` / `-v` / `-vv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Info and above.
    #[default]
    Normal,
    /// Debug and above, e.g. every storage write.
    Verbose,
    /// Everything, including the HTTP client and server internals.
    Trace,
}

impl Verbosity {
    /// Level applied to this crate's own events.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    ///
    /// Third-party crates stay at `warn` (`error` when quiet) unless the
    /// verbosity is [`Trace`](Self::Trace).
    #[must_use]
    pub fn filter_directives(&self) -> String {
        let level = self.to_level_filter().as_str().to_lowercase();
        let base = if *self == Self::Quiet { "error" } else { "warn" };

        let mut directives = vec![base.to_string()];
        directives.extend(OWN_TARGETS.iter().map(|t| format!("{t}={level}")));
        if *self == Self::Trace {
            directives.extend(HTTP_TARGETS.iter().map(|t| format!("{t}=debug")));
        }
        directives.join(",")
    }
}

/// Install the global subscriber. `RUST_LOG` overrides `verbosity`.
///
/// Calling it again is a no-op.
///
/// # Examples
///
/// ```no_run
/// use condominio::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directives()));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    );

    let _ = subscriber.try_init();
}

/// Warnings and errors, captured by the test harness.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_to_level() {
        assert_eq!(Verbosity::Quiet.to_level_filter(), Level::ERROR);
        assert_eq!(Verbosity::Normal.to_level_filter(), Level::INFO);
        assert_eq!(Verbosity::Verbose.to_level_filter(), Level::DEBUG);
        assert_eq!(Verbosity::Trace.to_level_filter(), Level::TRACE);
    }

    #[test]
    fn test_default_directives_cover_library_and_binary() {
        assert_eq!(
            Verbosity::Normal.filter_directives(),
            "warn,condominio=info,condo=info"
        );
        assert_eq!(
            Verbosity::Quiet.filter_directives(),
            "error,condominio=error,condo=error"
        );
    }

    #[test]
    fn test_trace_opens_http_targets() {
        let directives = Verbosity::Trace.filter_directives();
        assert!(directives.starts_with("warn,condominio=trace,condo=trace"));
        assert!(directives.contains("reqwest=debug"));
        assert!(!Verbosity::Verbose.filter_directives().contains("reqwest"));
    }

    #[test]
    fn test_directives_parse() {
        for verbosity in [
            Verbosity::Quiet,
            Verbosity::Normal,
            Verbosity::Verbose,
            Verbosity::Trace,
        ] {
            assert!(EnvFilter::try_new(verbosity.filter_directives()).is_ok());
        }
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging(Verbosity::Quiet);
        init_logging(Verbosity::Trace);
        init_test_logging();
    }
}
