use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;

use crate::settings::BalancerConfig;

/// Terminal logger at the configured level plus a file logger if `log_file` is set.
/// Fails if the log file cannot be created or a logger is already installed.
pub fn init_logger(config: &BalancerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let level = config.level_filter();
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = &config.log_file {
        let file = File::create(path)?;
        loggers.push(WriteLogger::new(level.max(LevelFilter::Info), Config::default(), file));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}
