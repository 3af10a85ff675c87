//! Terminal reporting for map builds and site inspection
//!
//! Colors follow NO_COLOR, CLICOLOR and CLICOLOR_FORCE via `colored`.

use std::fmt::Display;

use colored::Colorize;

const LABEL_WIDTH: usize = 10;

/// Fatal error, red `error:` prefix on stderr.
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Non-fatal data problem (skipped rows, missing photos) on stderr.
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "warning".yellow(), msg);
}

/// Finished build, green checkmark.
pub fn done(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Site name above an inspection report.
pub fn site_heading(name: &str) {
    println!("{}", name.cyan().bold());
}

/// Aligned `label: value` line.
pub fn field(label: &str, value: &(impl Display + ?Sized)) {
    let label = format!("{:<width$}", format!("{label}:"), width = LABEL_WIDTH);
    println!("  {} {}", label.green(), value);
}

/// Uncolored block (TOML, legend tree, completions).
pub fn raw(msg: &(impl Display + ?Sized)) {
    println!("{msg}");
}
