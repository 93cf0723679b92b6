/// File logging backend
///
/// Appends plain (uncolored) log lines to a daily log file when --log is
/// passed. Writes are buffered through a mutex-guarded writer; failures are
/// silent so a broken disk never takes down the relay.

use once_cell::sync::Lazy;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::sync::Mutex;

use crate::paths;

use super::config::get_logger_config;

static LOG_FILE: Lazy<Mutex<Option<BufWriter<std::fs::File>>>> = Lazy::new(|| Mutex::new(None));

/// Open the log file if file logging is enabled
pub fn init_file_logging() {
    if !get_logger_config().file_logging {
        return;
    }

    let path = paths::get_log_file_path();
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            if let Ok(mut guard) = LOG_FILE.lock() {
                *guard = Some(BufWriter::new(file));
            }
        }
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", path.display(), e);
        }
    }
}

/// Append one line to the log file (no-op when file logging is off)
pub fn write_to_file(line: &str) {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(writer) = guard.as_mut() {
            let _ = writeln!(writer, "{}", line);
        }
    }
}

/// Flush pending writes (called during shutdown)
pub fn flush_file_logging() {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(writer) = guard.as_mut() {
            let _ = writer.flush();
        }
    }
}
