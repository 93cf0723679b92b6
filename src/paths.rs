//! Centralized path resolution for the signal relay
//!
//! All file and directory paths are resolved through this module to ensure
//! consistent behavior across platforms.
//!
//! ## Path Strategy
//!
//! The base directory follows platform standards:
//! - **macOS**: `~/Library/Application Support/SignalRelay/`
//! - **Windows**: `%LOCALAPPDATA%\SignalRelay\`
//! - **Linux**: `$XDG_DATA_HOME/SignalRelay/` (fallback `~/.local/share/SignalRelay/`)
//!
//! ## Directory Structure
//!
//! ```text
//! ~/SignalRelay/
//! ├── data/
//! │ ├── config.json
//! │ └── transcripts/
//! │ └── <username>.json
//! └── logs/
//! └── signal_relay_*.log
//! ```

use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

// =============================================================================
// BASE DIRECTORY RESOLUTION
// =============================================================================

/// Tracks whether initialization logging has been done
static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Lazy-initialized base directory (thread-safe)
static BASE_DIRECTORY: Lazy<PathBuf> = Lazy::new(|| {
    let base_dir = resolve_base_directory();
    INITIALIZED.store(true, Ordering::SeqCst);
    base_dir
});

/// Resolves the base directory for all relay data
///
/// Uses platform-specific application data locations:
/// - macOS: ~/Library/Application Support/SignalRelay
/// - Windows: %LOCALAPPDATA%\SignalRelay
/// - Linux: $XDG_DATA_HOME/SignalRelay (fallback ~/.local/share/SignalRelay)
fn resolve_base_directory() -> PathBuf {
    const APP_DIR: &str = "SignalRelay";

    if let Some(dir) = dirs::data_local_dir() {
        return dir.join(APP_DIR);
    }

    if let Some(dir) = dirs::data_dir() {
        return dir.join(APP_DIR);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(APP_DIR);
    }

    PathBuf::from(APP_DIR)
}

// =============================================================================
// PRIMARY DIRECTORY ACCESSORS
// =============================================================================

/// Returns the base directory for all relay data
pub fn get_base_directory() -> PathBuf {
    BASE_DIRECTORY.clone()
}

/// Returns the data directory path
///
/// Contains the config file and the transcripts directory.
pub fn get_data_directory() -> PathBuf {
    BASE_DIRECTORY.join("data")
}

/// Returns the logs directory path
pub fn get_logs_directory() -> PathBuf {
    BASE_DIRECTORY.join("logs")
}

/// Returns the per-user transcripts directory path
pub fn get_transcripts_directory() -> PathBuf {
    get_data_directory().join("transcripts")
}

// =============================================================================
// FILE PATHS
// =============================================================================

/// Returns the main configuration file path
pub fn get_config_path() -> PathBuf {
    get_data_directory().join("config.json")
}

/// Returns the log file path for the current day
pub fn get_log_file_path() -> PathBuf {
    let date = chrono::Local::now().format("%Y-%m-%d");
    get_logs_directory().join(format!("signal_relay_{}.log", date))
}

// =============================================================================
// DIRECTORY CREATION
// =============================================================================

/// Creates all required directories if they do not exist
///
/// Must be called once at startup, before the logger or config are touched.
pub fn ensure_all_directories() -> Result<(), String> {
    let directories = [
        get_data_directory(),
        get_logs_directory(),
        get_transcripts_directory(),
    ];

    for dir in &directories {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("Failed to create directory {}: {}", dir.display(), e))?;
    }

    Ok(())
}

/// Checks if the base directory has been initialized
pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::SeqCst)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_directory_not_empty() {
        let base = get_base_directory();
        assert!(!base.as_os_str().is_empty());
    }

    #[test]
    fn test_data_directory_is_subdir() {
        let base = get_base_directory();
        let data = get_data_directory();
        assert!(data.starts_with(&base));
    }

    #[test]
    fn test_logs_directory_is_subdir() {
        let base = get_base_directory();
        let logs = get_logs_directory();
        assert!(logs.starts_with(&base));
    }

    #[test]
    fn test_config_path_in_data_dir() {
        let data = get_data_directory();
        let config = get_config_path();
        assert!(config.starts_with(&data));
        assert_eq!(config.file_name().unwrap(), "config.json");
    }

    #[test]
    fn test_transcripts_in_data_dir() {
        let data = get_data_directory();
        let transcripts = get_transcripts_directory();
        assert!(transcripts.starts_with(&data));
    }

    #[test]
    fn test_log_file_in_logs_dir() {
        let logs = get_logs_directory();
        let log_file = get_log_file_path();
        assert!(log_file.starts_with(&logs));
    }
}
