mod cli;
mod config;
mod error;
mod executor;
mod generator;
mod progress;
mod prompt;
mod ui;
mod update;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Err(err) = update::execute(&cli) {
        eprintln!("{} {}", "Error:".bold().red(), err.user_message());
        process::exit(1);
    }
}
