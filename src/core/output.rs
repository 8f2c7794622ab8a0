//! Colored output helpers shared by the git-revloc commands.
//!
//! Everything goes to stdout; errors carry a red marker. Field labels are
//! muted so values (paths, locators, ids) stand out when the output
//! is read by a person, and stay on one line each when it is piped.

use colored::*;

/// Prints an error message.
///
/// # Format
/// ```text
///
/// ✕ Error: <message>
///
/// ```
pub fn print_error(message: &str) {
    println!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Prints an informational message surrounded by blank lines.
pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Prints a section header, e.g. the file whose history follows.
pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white());
}

/// Prints one `label: value` line with the label padded to `width`.
pub fn print_field(label: &str, value: &str, width: usize) {
    println!(
        "{} {}",
        format!("{:<width$}", format!("{label}:")).bright_black(),
        value.white()
    );
}

/// Renders one history line: short id, date, author and summary.
pub fn format_history_line(short_sha: &str, date: &str, author: &str, summary: &str) -> String {
    format!(
        "{} {} {} {}",
        short_sha.yellow(),
        date.bright_black(),
        author.blue(),
        summary.white()
    )
}
