use std::fs::OpenOptions;
use std::path::PathBuf;

use log::{LevelFilter, info, warn};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use crate::config::LoggingConfig;
use crate::parse::{Pipeline, Result};

/// Longest input prefix written to a parse record.
const MAX_RECORDED_CHARS: usize = 200;

/// Install the process-wide logger: stderr at the configured level, plus an
/// appending log file when one is configured.
///
/// Best-effort: a bad level, an unwritable file or an already installed
/// logger is reported on stderr and otherwise ignored.
pub fn init(config: &LoggingConfig) {
    let level = parse_level(&config.level);
    if level == LevelFilter::Off {
        return;
    }

    let log_config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        log_config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(path) = log_file(config) {
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => loggers.push(WriteLogger::new(level, log_config, file)),
            Err(e) => eprintln!("shpipe: cannot open log file {}: {e}", path.display()),
        }
    }

    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("shpipe: logger already initialised: {e}");
    }
}

/// Level named in the config; unknown names fall back to `warn`.
fn parse_level(name: &str) -> LevelFilter {
    name.parse().unwrap_or_else(|_| {
        eprintln!("shpipe: unknown log level {name:?}, using warn");
        LevelFilter::Warn
    })
}

/// Configured log file with `~` and environment variables expanded.
fn log_file(config: &LoggingConfig) -> Option<PathBuf> {
    let raw = config.file.trim();
    if raw.is_empty() {
        return None;
    }
    match shellexpand::full(raw) {
        Ok(expanded) => Some(PathBuf::from(expanded.into_owned())),
        Err(e) => {
            eprintln!("shpipe: cannot expand log file path {raw:?}: {e}");
            None
        }
    }
}

/// Record the outcome of parsing one line.
pub fn record_parse(line: &str, result: &Result<Pipeline>) {
    let line = summarize(line);
    match result {
        Ok(pipeline) => info!("parsed {} process(es)\t{line}", pipeline.len()),
        Err(e) => warn!("rejected ({e})\t{line}"),
    }
}

/// Compact single-line form of the input, truncated.
fn summarize(line: &str) -> String {
    let oneline = line.replace(['\n', '\r'], " ");
    let mut out: String = oneline.chars().take(MAX_RECORDED_CHARS).collect();
    if oneline.chars().count() > MAX_RECORDED_CHARS {
        out.push('…');
    }
    out
}
