/// Logger configuration derived from command-line arguments
///
/// Built once at startup by scanning CMD_ARGS for --debug-<module>,
/// --verbose and --quiet flags; readable from any thread afterwards.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::RwLock;

use crate::arguments;

use super::levels::LogLevel;
use super::tags::LogTag;

/// Runtime logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Minimum level threshold (messages above are filtered)
    pub min_level: LogLevel,

    /// Tags with --debug-<module> enabled
    pub debug_tags: HashSet<String>,

    /// Tags with --verbose-<module> enabled
    pub verbose_tags: HashSet<String>,

    /// If non-empty, only these tags are logged
    pub enabled_tags: HashSet<String>,

    /// Whether log lines are also written to the log file
    pub file_logging: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            enabled_tags: HashSet::new(),
            file_logging: false,
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

/// Build configuration from the current command-line arguments
pub fn init_from_args() {
    let args = arguments::get_cmd_args();

    let mut config = LoggerConfig::default();

    if arguments::patterns::is_quiet_mode() {
        config.min_level = LogLevel::Warning;
    } else if arguments::patterns::is_verbose_mode() {
        config.min_level = LogLevel::Verbose;
    }

    for arg in &args {
        if let Some(module) = arg.strip_prefix("--debug-") {
            config.debug_tags.insert(module.to_string());
        }
        if let Some(module) = arg.strip_prefix("--verbose-") {
            config.verbose_tags.insert(module.to_string());
        }
    }

    // Debug flags imply at least debug-level threshold for their tags;
    // the per-tag gate in core.rs does the fine filtering.
    if !config.debug_tags.is_empty() && config.min_level < LogLevel::Debug {
        config.min_level = LogLevel::Debug;
    }

    config.file_logging = arguments::is_file_logging_enabled();

    set_logger_config(config);
}

/// Get a copy of the current logger configuration
pub fn get_logger_config() -> LoggerConfig {
    match LOGGER_CONFIG.read() {
        Ok(config) => config.clone(),
        Err(_) => LoggerConfig::default(),
    }
}

/// Replace the logger configuration
pub fn set_logger_config(config: LoggerConfig) {
    if let Ok(mut current) = LOGGER_CONFIG.write() {
        *current = config;
    }
}

/// Update the logger configuration in place
pub fn update_logger_config<F: FnOnce(&mut LoggerConfig)>(f: F) {
    if let Ok(mut current) = LOGGER_CONFIG.write() {
        f(&mut current);
    }
}

/// Whether --debug-<module> was passed for this tag
pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    let config = get_logger_config();
    config.debug_tags.contains(&tag.to_debug_key())
}

/// Whether --verbose-<module> was passed for this tag
pub fn is_verbose_enabled_for_tag(tag: &LogTag) -> bool {
    let config = get_logger_config();
    config.verbose_tags.contains(&tag.to_debug_key())
}
