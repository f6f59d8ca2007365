use colored::Colorize;
use std::io::{self, Write};

/// Print a status message for an operation that is about to run
pub fn status_message(message: &str) {
    println!("{} {} ... ", "⏳".yellow(), message.bright_white());
    let _ = io::stdout().flush();
}

pub fn success_message(message: &str) {
    println!("{} {}", "✅".green(), message.green());
}

pub fn warning_message(message: &str) {
    println!("{} {}", "⚠️ ".yellow(), message.yellow());
}

pub fn error_message(message: &str) {
    eprintln!("{} {}", "❌".red(), message.red().bold());
}

/// Print a section header to separate logical sections of output
pub fn section_header(title: &str) {
    println!("\n{}", format!("==== {} ====", title).cyan().bold());
}

pub fn info_message(message: &str) {
    println!("{} {}", "ℹ️ ".blue(), message.blue());
}

/// Extra diagnostics, shown only with `--verbose`
pub fn verbose_message(verbose: bool, message: &str) {
    if verbose {
        println!("  {}", message.dimmed());
    }
}

/// Print a step in a numbered list of steps
pub fn step_message(step_number: usize, message: &str) {
    println!("  {}. {}", format!("{}", step_number).cyan(), message);
}

/// Print generated changelog text between rules
pub fn entry_preview(title: &str, entry: &str) {
    section_header(title);
    println!("{}", entry);
    println!("{}", "=".repeat(40).cyan());
}
