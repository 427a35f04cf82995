// Mon Oct 12 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Process not found: nothing running matches '{0}'")]
    ProcessNotFound(String),
    #[error("Failed to attach to process {name} (pid {pid}): {reason}")]
    Attach {
        name: String,
        pid: u32,
        reason: String,
    },
    #[error("Could not find any of [{}] in {emulator}", .candidates.join(", "))]
    ModuleNotFound {
        emulator: String,
        candidates: Vec<String>,
    },
    #[error("Could not read any data from {0}")]
    UnreachableProcess(String),
    #[error("RAM signature not found in {0}, the game may not be loaded yet")]
    SignatureNotFound(String),
    #[error("Failed to read {size} bytes at address 0x{address:08x}{}", guest_suffix(.guest))]
    Read {
        address: u64,
        size: usize,
        guest: Option<u32>,
    },
    #[error("Not connected to an emulator")]
    NotConnected,
    #[error("Unsupported read width: {0} bytes")]
    UnsupportedWidth(usize),
    #[error("No supported emulator found (tried {0})")]
    NoEmulatorFound(String),
    #[error("Unknown emulator: {0}")]
    UnknownEmulator(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MemoryError {
    pub fn read(address: u64, size: usize) -> Self {
        Self::Read { address, size, guest: None }
    }

    /// Tags a host read failure with the guest address that produced it.
    pub fn with_guest_address(self, guest_address: u32) -> Self {
        match self {
            Self::Read { address, size, .. } => Self::Read {
                address,
                size,
                guest: Some(guest_address),
            },
            other => other,
        }
    }

    /// Failures that leave an established attachment usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::UnsupportedWidth(_))
    }
}

fn guest_suffix(guest: &Option<u32>) -> String {
    match guest {
        Some(addr) => format!(" (N64: 0x{:08x})", addr),
        None => String::new(),
    }
}
