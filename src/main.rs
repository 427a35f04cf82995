// Sat Oct 17 2026 - Alex

use clap::Parser;
use krossbones::ui::{print_error, Args, CommandHandler};
use std::process;

fn main() {
    let args = Args::parse();
    let mut handler = CommandHandler::new();

    if let Err(e) = handler.execute(args) {
        log::debug!("{:?}", e);
        print_error(&format!("{:#}", e));
        process::exit(1);
    }
}
