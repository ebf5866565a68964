//! tracing subscriber setup.
//!
//! The interactive screen owns stdout/stderr, so in that mode log lines go to
//! `digest.log` in the data directory. CLI subcommands log to stderr.
//! `PARENTING_DIGEST_LOG` overrides the level using `EnvFilter` syntax.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PARENTING_DIGEST_LOG";
const LOG_FILENAME: &str = "digest.log";

pub enum LogTarget {
    Stderr,
    /// Append to `digest.log` inside this directory
    File(PathBuf),
}

pub fn init_logging(target: LogTarget, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(dir) => {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(LOG_FILENAME))
                .context("Failed to open log file")?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
    };

    result.map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))
}
