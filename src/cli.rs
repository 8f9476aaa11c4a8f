/// Interactive menu and printing of results in text, JSON or table form
pub mod cli_main;
