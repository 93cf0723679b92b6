use signal_relay::{
    arguments::{self, patterns, print_debug_info, print_help},
    config::Config,
    logger::{self, LogTag},
    paths, webserver,
};

/// Main entry point for the signal relay
///
/// Startup order matters:
/// 1. Directories (the logger needs the logs directory for --log)
/// 2. Logger
/// 3. Argument validation and special modes (--help)
/// 4. Config
/// 5. Ctrl+C handler wired to graceful webserver shutdown
/// 6. Server (blocks until shutdown)
#[tokio::main]
async fn main() {
    // Ensure all directories exist BEFORE logger initialization
    if let Err(e) = paths::ensure_all_directories() {
        eprintln!("Failed to create required directories: {}", e);
        std::process::exit(1);
    }

    // Initialize logger system (now safe to create log files)
    logger::init();

    // Check for help request first (before any other processing)
    if patterns::is_help_requested() {
        print_help();
        std::process::exit(0);
    }

    // Reject malformed overrides before they reach the server
    if let Err(e) = arguments::validate_port_argument() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
    if let Err(e) = arguments::validate_host_argument() {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    logger::info(LogTag::System, "Signal relay starting up...");

    // Print debug information if any debug modes are enabled
    print_debug_info();

    // Load configuration (creates the default file on first run)
    let config_path = arguments::get_config_path_override()
        .unwrap_or_else(|| paths::get_config_path().to_string_lossy().to_string());

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            logger::error(LogTag::Config, &format!("Failed to load config: {:#}", e));
            std::process::exit(1);
        }
    };
    logger::info(LogTag::Config, &format!("Config loaded from {}", config_path));

    // Graceful shutdown on Ctrl+C
    if let Err(e) = ctrlc::set_handler(|| {
        println!();
        webserver::shutdown();
    }) {
        logger::error(LogTag::System, &format!("Failed to set Ctrl+C handler: {}", e));
        std::process::exit(1);
    }

    // Run the server (blocks until shutdown is triggered)
    if let Err(e) = webserver::start_server(config).await {
        logger::error(LogTag::System, &e);
        logger::flush();
        std::process::exit(1);
    }

    logger::info(LogTag::System, "Signal relay stopped");
    logger::flush();
}
