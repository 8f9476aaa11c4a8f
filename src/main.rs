use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

use KiStoich::Utils::logger::init_logger;
use KiStoich::cli::cli_main::{balance_and_print, balance_file, run_interactive_menu};
use KiStoich::settings::{ConfigManager, DEFAULT_CONFIG_FILE, OutputFormat};

#[derive(Parser)]
#[command(name = "kistoich")]
#[command(about = "Balances chemical equations, e.g. \"H2 + O2 = H2O\" -> \"2H2 + O2 = 2H2O\"")]
#[command(version)]
struct Args {
    /// Equations to balance
    equations: Vec<String>,

    /// Text file with one equation per line ('#' starts a comment)
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Output format: text, json or table (overrides the config file)
    #[arg(long, value_name = "FORMAT")]
    format: Option<OutputFormat>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Print the balance matrix before the answer
    #[arg(long)]
    show_matrix: bool,

    /// Start the interactive menu
    #[arg(short, long)]
    interactive: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let mut manager = ConfigManager::with_config_file(&args.config);
    init_logger(manager.get_config())?;

    let mut config = manager.get_config().clone();
    if let Some(format) = args.format {
        config.output_format = format;
    }
    config.show_matrix |= args.show_matrix;

    let batch = !args.equations.is_empty() || args.file.is_some();
    let mut failed = false;
    for equation in &args.equations {
        failed |= !balance_and_print(equation, &config)?;
    }
    if let Some(file) = &args.file {
        failed |= !balance_file(&file.to_string_lossy(), &config)?.is_success();
    }

    if args.interactive || !batch {
        run_interactive_menu(&mut manager)?;
    }
    if failed {
        std::process::exit(1);
    }
    Ok(())
}
