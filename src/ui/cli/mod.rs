// Sat Oct 17 2026 - Alex

pub mod args;
pub mod handler;

pub use args::{Args, Command, ConnectArgs, ProcessesArgs, ReadArgs, TrackArgs};
pub use handler::CommandHandler;
