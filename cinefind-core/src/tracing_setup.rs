//! Tracing setup for Cinefind
//!
//! Console output at the user's chosen level, plus a trace-level log of the last
//! run on disk so a failed search can be replayed call by call.

use std::fs::{File, create_dir_all};
use std::path::Path;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::CinefindError;

/// Crates logged at trace level in the run file.
const TRACED_CRATES: &[&str] = &["cinefind_core", "cinefind_search", "cinefind"];

/// File name of the per-run log, replaced on every start.
pub const RUN_LOG_FILE: &str = "cinefind-last-run.log";

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides `console_level` for the console. The run file under
/// `logs_dir` (default `./logs`) always gets trace output from cinefind crates.
///
/// # Errors
///
/// - `CinefindError::Io` - If logs directory cannot be created or log file cannot be opened for writing
/// - `CinefindError::Configuration` - If a global subscriber is already installed
pub fn init_tracing(console_level: Level, logs_dir: Option<&Path>) -> Result<(), CinefindError> {
    let logs_path = logs_dir.unwrap_or_else(|| Path::new("logs"));

    create_dir_all(logs_path)?;
    let log_file_path = logs_path.join(RUN_LOG_FILE);
    let log_file = File::create(&log_file_path)?;

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level.to_string()));

    let console_layer = fmt::layer()
        .with_target(false)
        .without_time()
        .with_filter(console_filter);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(log_file)
        .with_filter(EnvFilter::new(run_file_directives()));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CinefindError::Configuration {
            reason: format!("tracing already initialized: {e}"),
        })?;

    tracing::info!(
        console = %console_level,
        file = %log_file_path.display(),
        "Logging started"
    );

    Ok(())
}

fn run_file_directives() -> String {
    TRACED_CRATES
        .iter()
        .fold(String::from("info"), |acc, krate| format!("{acc},{krate}=trace"))
}

/// Console verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliLogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Progress of each search
    Info,
    /// Every remote call
    Debug,
    /// Everything
    Trace,
}

impl CliLogLevel {
    /// Converts CLI log level to tracing Level enum.
    ///
    /// # Examples
    /// ```
    /// use cinefind_core::tracing_setup::CliLogLevel;
    ///
    /// let level = CliLogLevel::Info.as_tracing_level();
    /// assert_eq!(level, tracing::Level::INFO);
    /// ```
    pub fn as_tracing_level(self) -> Level {
        match self {
            CliLogLevel::Error => Level::ERROR,
            CliLogLevel::Warn => Level::WARN,
            CliLogLevel::Info => Level::INFO,
            CliLogLevel::Debug => Level::DEBUG,
            CliLogLevel::Trace => Level::TRACE,
        }
    }
}

impl std::str::FromStr for CliLogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as clap::ValueEnum>::from_str(s, true).map_err(|_| format!("Invalid log level: {s}"))
    }
}

impl std::fmt::Display for CliLogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.as_tracing_level().as_str().to_lowercase();
        f.write_str(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert!(matches!("WARN".parse::<CliLogLevel>(), Ok(CliLogLevel::Warn)));
        assert!("verbose".parse::<CliLogLevel>().is_err());
        assert_eq!(CliLogLevel::Debug.as_tracing_level(), Level::DEBUG);
        assert_eq!(CliLogLevel::Trace.to_string(), "trace");
    }

    #[test]
    fn test_run_file_directives_cover_workspace() {
        let directives = run_file_directives();
        assert!(directives.contains("cinefind_search=trace"));
        assert!(EnvFilter::try_new(directives).is_ok());
    }
}
