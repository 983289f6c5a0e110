//! Stderr logger for the CLI and examples.
//!
//! Lines look like `[  0.012s DEBUG ridgepoint_singular] message`. Only
//! records from `ridgepoint*` targets are shown below `Info`, so dependency
//! chatter stays out of debug runs.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

struct StageLogger {
    level: LevelFilter,
    started: Instant,
}

impl StageLogger {
    fn is_own_target(target: &str) -> bool {
        target.starts_with("ridgepoint")
    }
}

impl Log for StageLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > self.level {
            return false;
        }
        metadata.level() <= Level::Info || Self::is_own_target(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:7.3}s {:>5} {}] {}",
            elapsed,
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StageLogger> = OnceLock::new();

/// Install the stderr logger with the provided level filter.
///
/// Only the first call installs anything; later calls return `Ok(())`.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| StageLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// `Debug` when `verbose`, `Info` otherwise.
pub fn init_from_verbosity(verbose: bool) -> Result<(), log::SetLoggerError> {
    init_with_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    })
}

/// Filter directive used when `RUST_LOG` is unset.
#[cfg(feature = "tracing")]
fn default_directive(level: LevelFilter) -> String {
    level.to_string().to_ascii_lowercase()
}

/// Install a `tracing-subscriber` fmt subscriber filtered by `RUST_LOG`,
/// falling back to `default_level`, closing spans with their timings.
///
/// `log` records are not bridged here; install `tracing_log::LogTracer` first
/// to see them.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool, default_level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(default_level)));
    if json {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .flatten_event(true)
            .finish()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}
