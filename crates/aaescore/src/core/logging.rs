//! Logging initialization
//!
//! Console + file logger shared by the bot and the operator CLI.

use anyhow::Result;
use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the file or a logger was already set
pub fn init_logger(log_file_path: &str) -> Result<()> {
    init_with_terminal(log_file_path, TerminalMode::Mixed)
}

/// Same as [`init_logger`] but keeps stdout clean for machine-readable output
pub fn init_cli_logger(log_file_path: &str) -> Result<()> {
    init_with_terminal(log_file_path, TerminalMode::Stderr)
}

fn init_with_terminal(log_file_path: &str, mode: TerminalMode) -> Result<()> {
    let log_file =
        fs_err::File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(LevelFilter::Info, Config::default(), mode, ColorChoice::Auto),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs which drive credentials and index roots are configured
///
/// Secrets themselves are never printed, only their presence.
pub fn log_drive_configuration() {
    use crate::core::config;

    log::info!("Drive API: {}", config::DRIVE_API_URL.as_str());
    match (config::DRIVE_API_KEY.is_some(), config::DRIVE_ACCESS_TOKEN.is_some()) {
        (false, false) => log::warn!("No DRIVE_API_KEY or DRIVE_ACCESS_TOKEN set, drive requests will be rejected"),
        (key, token) => log::info!("Drive credentials: api key={}, bearer token={}", key, token),
    }
    match config::DRIVE_SEARCH_SCOPE.as_deref() {
        Some(scope) => log::info!("Folder search scope: {}", scope),
        None => log::info!("Folder search scope: all visible folders"),
    }
    log::info!("Flat index: {}", config::INDEX_PATH.as_str());
}
