//! Stderr logging for the library crates' `log` output.
//!
//! `--quiet` shows errors only, the default shows warnings, `-v` adds
//! scenario progress and statistics, and `-vv` adds per-sample traces.
//! `RUST_LOG` overrides the flag-derived level when set.

use log::LevelFilter;

/// Maps the global quiet/verbose flags to a log level.
pub fn level_for(quiet: bool, verbose: u8) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the stderr logger. Later calls are ignored.
pub fn init(quiet: bool, verbose: u8) {
    let _ = env_logger::Builder::new()
        .filter_level(level_for(quiet, verbose))
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .target(env_logger::Target::Stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(level_for(true, 2), LevelFilter::Error);
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(false, 0), LevelFilter::Warn);
        assert_eq!(level_for(false, 1), LevelFilter::Debug);
        assert_eq!(level_for(false, 2), LevelFilter::Trace);
        assert_eq!(level_for(false, 7), LevelFilter::Trace);
    }
}
