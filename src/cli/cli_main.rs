use crate::Chemistry::balancer::{BalanceReport, BalancerError, balance, balance_matrix_of};
use crate::Utils::load_from_file::load_equations_from_file;
use crate::settings::{BalancerConfig, ConfigManager, OutputFormat};
use log::error;
use std::error::Error;
use std::io::{self, Write};

pub fn run_interactive_menu(manager: &mut ConfigManager) -> Result<(), Box<dyn Error>> {
    loop {
        show_main_menu()?;
        let choice = get_user_input()?;

        match choice.trim() {
            "1" => {
                let source = prompt("Enter equation (e.g. H2 + O2 = H2O): ")?;
                balance_and_print(source.trim(), manager.get_config())?;
            }
            "2" => {
                let file_name = prompt("Enter file name: ")?;
                balance_file(file_name.trim(), manager.get_config())?;
            }
            "3" => {
                let source = prompt("Enter equation: ")?;
                show_matrix(source.trim())?;
            }
            "4" => settings_menu(manager)?,
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
    Ok(())
}
/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options

Cyan (\x1b[36m) - "Enter your choice:" prompt

Red (\x1b[31m) - errors caused by the input
*/
fn show_main_menu() -> io::Result<()> {
    println!("\x1b[34m\n Welcome to KiStoich: chemical equation balancer \n\x1b[0m");
    println!("\x1b[33m1. Balance equation\x1b[0m");
    println!("\x1b[33m2. Balance equations from file\x1b[0m");
    println!("\x1b[33m3. Show balance matrix\x1b[0m");
    println!("\x1b[33m4. Settings\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    io::stdout().flush()
}

fn settings_menu(manager: &mut ConfigManager) -> Result<(), Box<dyn Error>> {
    loop {
        let config = manager.get_config();
        println!("\n=== Settings ({}) ===", manager.config_file());
        println!("1. Output format: {}", config.output_format);
        println!("2. Log level: {}", config.log_level);
        println!(
            "3. Log file: {}",
            config.log_file.as_deref().unwrap_or("none")
        );
        println!("4. Show balance matrix: {}", config.show_matrix);
        println!("5. Reset to defaults");
        println!("0. Back to main menu");
        print!("Enter your choice: ");
        io::stdout().flush()?;

        let choice = get_user_input()?;
        let result = match choice.trim() {
            "1" => {
                let input = prompt("Output format (text, json, table): ")?;
                match input.parse::<OutputFormat>() {
                    Ok(format) => manager.set_output_format(format),
                    Err(e) => Err(e.into()),
                }
            }
            "2" => {
                let input = prompt("Log level (off, error, warn, info, debug, trace): ")?;
                let result = manager.set_log_level(&input);
                if result.is_ok() {
                    println!("New log level is used after restart");
                }
                result
            }
            "3" => {
                let input = prompt("Log file (empty to disable): ")?;
                manager.set_log_file(&input)
            }
            "4" => {
                let show = !manager.get_config().show_matrix;
                manager.set_show_matrix(show)
            }
            "5" => manager.reset_to_defaults(),
            "0" => break,
            _ => {
                println!("Invalid choice. Please try again.");
                Ok(())
            }
        };
        if let Err(e) = result {
            println!("\x1b[31mError: {}\x1b[0m", e);
        }
    }
    Ok(())
}

/// Message for errors caused by the input, None for internal errors
pub fn describe_error(e: &BalancerError) -> Option<String> {
    match e {
        BalancerError::Syntax(e) => Some(format!(
            "Syntax error at position {}: {}",
            e.position, e.message
        )),
        BalancerError::Balance(e) => Some(format!("Balance error: {}", e)),
        _ => None,
    }
}

/// Report in the chosen format
pub fn format_report(
    report: &BalanceReport,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(report.balanced.clone()),
        OutputFormat::Json => serde_json::to_string_pretty(report),
        OutputFormat::Table => Ok(format!("{}\n{}", report.balanced, report.to_table())),
    }
}

/// Balances and prints one equation. Input errors are printed and reported as `Ok(false)`,
/// internal errors are returned.
pub fn balance_and_print(source: &str, config: &BalancerConfig) -> Result<bool, Box<dyn Error>> {
    if config.show_matrix {
        show_matrix(source)?;
    }
    match balance(source) {
        Ok(report) => {
            println!("{}", format_report(&report, config.output_format)?);
            Ok(true)
        }
        Err(e) => match describe_error(&e) {
            Some(message) => {
                println!("\x1b[31m{}\x1b[0m", message);
                Ok(false)
            }
            None => {
                error!("internal error while balancing '{}': {}", source, e);
                Err(e.into())
            }
        },
    }
}

/// outcome of balancing a file of equations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub loaded: bool,
    pub balanced: usize,
    pub total: usize,
}

impl BatchSummary {
    /// the file was read and every equation in it was balanced
    pub fn is_success(&self) -> bool {
        self.loaded && self.balanced == self.total
    }
}

/// Balances every equation of the file
pub fn balance_file(file_name: &str, config: &BalancerConfig) -> Result<BatchSummary, Box<dyn Error>> {
    let equations = match load_equations_from_file(file_name) {
        Ok(equations) => equations,
        Err(e) => {
            println!("\x1b[31m{}\x1b[0m", e);
            return Ok(BatchSummary::default());
        }
    };
    let mut summary = BatchSummary {
        loaded: true,
        balanced: 0,
        total: equations.len(),
    };
    for equation in &equations {
        println!("{}", equation);
        if balance_and_print(equation, config)? {
            summary.balanced += 1;
        }
    }
    println!("Balanced {} of {} equations", summary.balanced, summary.total);
    Ok(summary)
}

/// Prints the raw balance matrix and its unit (solved) form
pub fn show_matrix(source: &str) -> Result<(), Box<dyn Error>> {
    let mut matrix = match balance_matrix_of(source) {
        Ok(matrix) => matrix,
        Err(e) => {
            return match describe_error(&e) {
                Some(message) => {
                    println!("\x1b[31m{}\x1b[0m", message);
                    Ok(())
                }
                None => Err(e.into()),
            };
        }
    };
    println!("Balance matrix:");
    matrix.to_table().printstd();
    if let Err(e) = matrix.normalize() {
        let e = BalancerError::from(e);
        error!("cannot reduce balance matrix of '{}': {}", source, e);
        return Err(e.into());
    }
    println!("Unit form:");
    matrix.to_table().printstd();
    Ok(())
}

fn prompt(message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    get_user_input()
}

fn get_user_input() -> io::Result<String> {
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input)
}
