/// Centralized argument handling for the signal relay
///
/// This module consolidates all command-line argument parsing and debug flag
/// checking used throughout the application.
///
/// Features:
/// - Centralized CMD_ARGS storage with thread-safe access
/// - Debug flag checking functions for all modules
/// - Webserver host/port overrides with validation
/// - Unified argument parsing utilities
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
/// Thread-safe singleton that stores arguments for access throughout the application
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
/// Used by tests to override the default env::args() collection
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
/// Returns a vector clone to avoid holding the mutex lock
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => {
            // Fallback to env::args if mutex is poisoned
            env::args().collect()
        }
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args()
        .iter()
        .any(|a| a == arg)
}

/// Gets the value of a command-line argument that follows a flag
/// Returns None if the flag is not found or has no value
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    for (i, arg) in args.iter().enumerate() {
        if arg == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

// =============================================================================
// DEBUG FLAG CHECKING FUNCTIONS
// These functions check for specific debug flags in the command-line arguments
// =============================================================================

/// Webserver (HTTP layer) debug mode
pub fn is_debug_webserver_enabled() -> bool {
    has_arg("--debug-webserver")
}

/// WebSocket connection lifecycle debug mode
pub fn is_debug_ws_enabled() -> bool {
    has_arg("--debug-ws")
}

/// Relay routing (broadcast/unicast) debug mode
pub fn is_debug_relay_enabled() -> bool {
    has_arg("--debug-relay")
}

/// Media service calls debug mode
pub fn is_debug_media_enabled() -> bool {
    has_arg("--debug-media")
}

/// Transcript memory debug mode
pub fn is_debug_memory_enabled() -> bool {
    has_arg("--debug-memory")
}

/// System operations debug mode
pub fn is_debug_system_enabled() -> bool {
    has_arg("--debug-system")
}

/// Configuration handling debug mode
pub fn is_debug_config_enabled() -> bool {
    has_arg("--debug-config")
}

/// File logging mode - writes log lines to the logs directory as well
pub fn is_file_logging_enabled() -> bool {
    has_arg("--log")
}

// =============================================================================
// WEBSERVER OVERRIDES
// =============================================================================

/// Gets the webserver port override from --port, if provided
pub fn get_port_override() -> Option<u16> {
    get_arg_value("--port").and_then(|s| s.parse().ok())
}

/// Gets the webserver host override from --host, if provided
pub fn get_host_override() -> Option<String> {
    get_arg_value("--host")
}

/// Ports below 1024 need elevated privileges on most systems
pub fn is_privileged_port(port: u16) -> bool {
    port < 1024
}

/// Validates the --port argument if present
/// Rejects values that are not valid TCP ports
pub fn validate_port_argument() -> Result<(), String> {
    let raw = match get_arg_value("--port") {
        Some(raw) => raw,
        None => return Ok(()),
    };

    match raw.parse::<u16>() {
        Ok(0) => Err("Invalid --port value: 0 is not a usable port".to_string()),
        Ok(_) => Ok(()),
        Err(_) => Err(format!(
            "Invalid --port value '{}': expected a number between 1 and 65535",
            raw
        )),
    }
}

/// Validates the --host argument if present
/// Accepts IP addresses and "localhost"
pub fn validate_host_argument() -> Result<(), String> {
    let raw = match get_arg_value("--host") {
        Some(raw) => raw,
        None => return Ok(()),
    };

    if raw == "localhost" || raw.parse::<std::net::IpAddr>().is_ok() {
        Ok(())
    } else {
        Err(format!(
            "Invalid --host value '{}': expected an IP address or 'localhost'",
            raw
        ))
    }
}

/// Gets the config file path override from --config, if provided
pub fn get_config_path_override() -> Option<String> {
    get_arg_value("--config")
}

// =============================================================================
// HELP SYSTEM
// =============================================================================

/// Displays the help menu with all available flags and their descriptions
pub fn print_help() {
    println!("Signal Relay - realtime signaling relay with media endpoints");
    println!();
    println!("USAGE:");
    println!("    signal-relay [FLAGS]");
    println!();
    println!("CORE FLAGS:");
    println!("    --port <PORT>             Override the webserver port");
    println!("    --host <HOST>             Override the webserver bind host");
    println!("    --config <PATH>           Use an alternative config file");
    println!("    --log                     Also write logs to the logs directory");
    println!("    --quiet, -q               Only show warnings and errors");
    println!("    --verbose, -v             Show verbose trace output");
    println!("    --help, -h                Show this help message");
    println!();
    println!("DEBUG FLAGS:");
    println!("    --debug-config            Configuration handling debug mode");
    println!("    --debug-media             Media service calls debug mode");
    println!("    --debug-memory            Transcript memory debug mode");
    println!("    --debug-relay             Relay routing debug mode");
    println!("    --debug-system            System operations debug mode");
    println!("    --debug-webserver         Webserver debug mode");
    println!("    --debug-ws                WebSocket connection debug mode");
    println!();
    println!("EXAMPLES:");
    println!("    signal-relay                                # Start with defaults");
    println!("    signal-relay --port 9000                    # Start on port 9000");
    println!("    signal-relay --host 0.0.0.0 --port 8080     # Expose on all interfaces");
    println!("    signal-relay --debug-ws --debug-relay       # Trace connection + routing");
    println!("    signal-relay --log                          # Persist logs to disk");
}

// =============================================================================
// UTILITY FUNCTIONS
// =============================================================================

/// Checks if any debug mode is enabled
pub fn is_any_debug_enabled() -> bool {
    is_debug_webserver_enabled() ||
        is_debug_ws_enabled() ||
        is_debug_relay_enabled() ||
        is_debug_media_enabled() ||
        is_debug_memory_enabled() ||
        is_debug_system_enabled() ||
        is_debug_config_enabled()
}

/// Gets a list of all enabled debug modes
pub fn get_enabled_debug_modes() -> Vec<&'static str> {
    let mut modes = Vec::new();

    if is_debug_webserver_enabled() {
        modes.push("webserver");
    }
    if is_debug_ws_enabled() {
        modes.push("ws");
    }
    if is_debug_relay_enabled() {
        modes.push("relay");
    }
    if is_debug_media_enabled() {
        modes.push("media");
    }
    if is_debug_memory_enabled() {
        modes.push("memory");
    }
    if is_debug_system_enabled() {
        modes.push("system");
    }
    if is_debug_config_enabled() {
        modes.push("config");
    }

    modes
}

/// Prints debug information about current arguments and enabled debug modes
pub fn print_debug_info() {
    let enabled_modes = get_enabled_debug_modes();
    if !enabled_modes.is_empty() {
        println!("Enabled debug modes: {:?}", enabled_modes);
    }
}

// =============================================================================
// COMMON ARGUMENT PATTERNS
// =============================================================================

/// Common argument parsing patterns
pub mod patterns {
    use super::*;

    /// Checks for help flags
    pub fn is_help_requested() -> bool {
        has_arg("--help") || has_arg("-h")
    }

    /// Checks for version flags
    pub fn is_version_requested() -> bool {
        has_arg("--version") || has_arg("-V")
    }

    /// Checks for quiet/silent mode
    pub fn is_quiet_mode() -> bool {
        has_arg("--quiet") || has_arg("-q")
    }

    /// Checks for verbose mode
    pub fn is_verbose_mode() -> bool {
        has_arg("--verbose") || has_arg("-v")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // CMD_ARGS is process-global, so the argument behaviors are exercised in
    // a single test to avoid cross-test interference.
    #[test]
    fn test_argument_parsing() {
        let test_args = vec![
            "signal-relay".to_string(),
            "--debug-ws".to_string(),
            "--debug-relay".to_string(),
            "--port".to_string(),
            "9000".to_string(),
        ];

        set_cmd_args(test_args.clone());
        assert_eq!(get_cmd_args(), test_args);

        assert!(has_arg("--debug-ws"));
        assert!(!has_arg("--debug-media"));
        assert_eq!(get_arg_value("--port"), Some("9000".to_string()));
        assert_eq!(get_arg_value("--host"), None);

        assert!(is_debug_ws_enabled());
        assert!(is_debug_relay_enabled());
        assert!(!is_debug_webserver_enabled());
        assert!(is_any_debug_enabled());

        let enabled_modes = get_enabled_debug_modes();
        assert!(enabled_modes.contains(&"ws"));
        assert!(enabled_modes.contains(&"relay"));
        assert!(!enabled_modes.contains(&"media"));

        assert_eq!(get_port_override(), Some(9000));
        assert!(validate_port_argument().is_ok());
        assert!(validate_host_argument().is_ok());

        set_cmd_args(vec![
            "signal-relay".to_string(),
            "--port".to_string(),
            "not-a-port".to_string(),
            "--host".to_string(),
            "bad host".to_string(),
        ]);
        assert!(validate_port_argument().is_err());
        assert!(validate_host_argument().is_err());

        set_cmd_args(vec![
            "signal-relay".to_string(),
            "--host".to_string(),
            "localhost".to_string(),
            "--help".to_string(),
            "-q".to_string(),
        ]);
        assert!(validate_host_argument().is_ok());
        assert!(patterns::is_help_requested());
        assert!(patterns::is_quiet_mode());
        assert!(!patterns::is_verbose_mode());
    }

    #[test]
    fn test_privileged_port_classification() {
        assert!(is_privileged_port(80));
        assert!(is_privileged_port(443));
        assert!(!is_privileged_port(8080));
    }
}
