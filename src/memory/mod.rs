// Mon Oct 12 2026 - Alex

pub mod address;
pub mod error;
pub mod image;
pub mod mapping;
pub mod process;
pub mod traits;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub mod linux;
#[cfg(windows)]
pub mod win32;

pub use address::Address;
pub use error::MemoryError;
pub use image::{ExitSignal, ImageBackend, MemoryImage};
pub use mapping::{MapEntry, MapPerms};
pub use process::{
    find_module, find_process, host_backend, list_processes, ModuleRecord, ProcessRecord,
};
pub use traits::{ProcessBackend, RemoteMemory};
