// Sat Oct 17 2026 - Alex

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "krossbones")]
#[command(author = "Alex")]
#[command(version)]
#[command(about = "Attach to a running N64 emulator and read DK64 guest memory", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// JSON settings file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List running processes.
    Processes(ProcessesArgs),
    /// List the supported emulators and their search parameters.
    Profiles,
    /// Attach to an emulator and report where guest RAM lives.
    Connect(ConnectArgs),
    /// Read one guest address.
    Read(ReadArgs),
    /// Poll the item catalog and print what changes.
    Track(TrackArgs),
}

#[derive(Parser, Debug)]
pub struct ProcessesArgs {
    /// Only show processes whose name starts with this (case-insensitive).
    #[arg(short, long)]
    pub filter: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ConnectArgs {
    /// Emulator key, e.g. `rmg` or `bizhawk`. Tries all of them when omitted.
    #[arg(short, long)]
    pub emulator: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ReadArgs {
    /// Guest address, hex with or without 0x.
    pub address: String,

    #[arg(short, long)]
    pub emulator: Option<String>,

    #[arg(short, long, default_value = "4")]
    pub width: usize,

    /// Interpret the word as a guest float.
    #[arg(long)]
    pub float: bool,
}

#[derive(Parser, Debug)]
pub struct TrackArgs {
    #[arg(short, long)]
    pub emulator: Option<String>,

    /// Stop after this many ticks.
    #[arg(short, long)]
    pub ticks: Option<u64>,

    /// Print the full item table when tracking stops.
    #[arg(long)]
    pub all: bool,
}

impl ReadArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.float && self.width != 4 {
            return Err("--float needs a width of 4".to_string());
        }
        if ![1, 2, 4].contains(&self.width) {
            return Err(format!("Unsupported width {} (use 1, 2 or 4)", self.width));
        }
        Ok(())
    }
}
