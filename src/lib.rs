// Sat Oct 17 2026 - Alex

pub mod config;
pub mod emulator;
pub mod memory;
pub mod session;
pub mod tracker;
pub mod ui;
pub mod utils;

pub use config::Config;
pub use emulator::{Attachment, EmulatorId, EmulatorProfile, GuestMemory, ReadWidth};
pub use memory::{Address, MemoryError, ProcessBackend, RemoteMemory};
pub use session::{ConnectionStatus, Session};
pub use tracker::{Poller, Tracker};
