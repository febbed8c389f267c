//! Logging and tracing configuration
//!
//! Structured logs go to stderr through `tracing`, leaving stdout for reports.
//!
//! # Log Levels
//!
//! - `error` - A source or the whole run failed
//! - `warn`  - A source was aborted or changed size while reading (default)
//! - `info`  - Run configuration and written reports (`-v`)
//! - `debug` - Source open/close, EWF segment discovery (`-vv`)
//! - `trace` - Every dispatched block, EWF section walks (`-vvv`)
//!
//! # Environment Variable Control
//!
//! `RUST_LOG` replaces the level picked from the command line:
//! ```bash
//! RUST_LOG=debug digestive -m disk.dd
//! RUST_LOG=digestive::ewf=trace digestive -m disk.E01
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter directive for a `-v` count, or errors only when quiet
pub fn default_directive(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "digestive=error";
    }
    match verbosity {
        0 => "digestive=warn",
        1 => "digestive=info",
        2 => "digestive=debug",
        _ => "digestive=trace",
    }
}

/// Initialize the logging/tracing system
///
/// Call once at startup; later calls are ignored.
pub fn init(verbosity: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity, quiet)));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(verbosity >= 2)
            .with_thread_names(verbosity >= 3)
            .with_file(false)
            .with_line_number(false)
            .compact(),
    );

    // Set as global default (ignore error if already set)
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, info};

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(0, false), "digestive=warn");
        assert_eq!(default_directive(1, false), "digestive=info");
        assert_eq!(default_directive(2, false), "digestive=debug");
        assert_eq!(default_directive(7, false), "digestive=trace");
        assert_eq!(default_directive(3, true), "digestive=error");
    }

    #[test]
    fn test_init() {
        init(2, false);
        init(0, true);
        info!("Test log message");
        debug!(key = "value", "Structured log");
    }
}
