// Sat Oct 17 2026 - Alex

pub mod cli;
pub mod spinner;
pub mod table;

pub use cli::{Args, Command, CommandHandler};
pub use spinner::Spinner;
pub use table::TableBuilder;

use colored::Colorize;

pub fn print_info(message: &str) {
    println!("{} {}", "[*]".cyan(), message);
}

pub fn print_success(message: &str) {
    println!("{} {}", "[+]".green(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", "[!]".yellow(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "[-]".red(), message);
}
