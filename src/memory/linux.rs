// Tue Oct 13 2026 - Alex

use crate::memory::mapping::modules_from_maps;
use crate::memory::process::{next_handle_id, privilege_hint};
use crate::memory::{Address, MemoryError, ModuleRecord, ProcessBackend, ProcessRecord, RemoteMemory};
use std::fs::{self, File};
use std::io::ErrorKind;
use std::os::unix::fs::FileExt;
use std::path::PathBuf;

/// Enumerates `/proc` and reads through `/proc/<pid>/mem`.
pub struct ProcfsBackend {
    root: PathBuf,
}

impl ProcfsBackend {
    pub fn new() -> Self {
        Self { root: PathBuf::from("/proc") }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read_comm(&self, pid: u32) -> Option<String> {
        let comm = fs::read_to_string(self.root.join(pid.to_string()).join("comm")).ok()?;
        let name = comm.trim_end_matches('\n').to_string();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

impl Default for ProcfsBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessBackend for ProcfsBackend {
    fn name(&self) -> &'static str {
        "procfs"
    }

    fn list_processes(&self) -> Vec<ProcessRecord> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("Cannot list {}: {}", self.root.display(), e);
                return Vec::new();
            }
        };

        let mut processes = Vec::new();
        for entry in entries.flatten() {
            let pid = match entry.file_name().to_str().and_then(|s| s.parse::<u32>().ok()) {
                Some(pid) if pid > 0 => pid,
                _ => continue,
            };
            if let Some(name) = self.read_comm(pid) {
                processes.push(ProcessRecord { name, pid });
            }
        }
        processes
    }

    fn is_alive(&self, pid: u32) -> bool {
        pid > 0 && self.root.join(pid.to_string()).exists()
    }

    fn open_process(&self, process: &ProcessRecord) -> Result<Box<dyn RemoteMemory>, MemoryError> {
        let path = self.root.join(process.pid.to_string()).join("mem");
        let memory = File::options()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| {
                let mut reason = format!("cannot open {}: {}", path.display(), e);
                if e.kind() == ErrorKind::PermissionDenied {
                    reason.push('.');
                    reason.push_str(privilege_hint());
                }
                MemoryError::Attach {
                    name: process.name.clone(),
                    pid: process.pid,
                    reason,
                }
            })?;

        log::debug!("Opened {} for {} (pid {})", path.display(), process.name, process.pid);

        Ok(Box::new(ProcfsMemory {
            pid: process.pid,
            maps_path: self.root.join(process.pid.to_string()).join("maps"),
            memory: Some(memory),
            handle_id: next_handle_id(),
        }))
    }
}

pub struct ProcfsMemory {
    pid: u32,
    maps_path: PathBuf,
    memory: Option<File>,
    handle_id: u64,
}

impl RemoteMemory for ProcfsMemory {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn handle_id(&self) -> u64 {
        self.handle_id
    }

    fn is_open(&self) -> bool {
        self.memory.is_some()
    }

    fn list_modules(&self) -> Vec<ModuleRecord> {
        match fs::read_to_string(&self.maps_path) {
            Ok(maps) => modules_from_maps(&maps),
            Err(e) => {
                log::debug!("Cannot read {}: {}", self.maps_path.display(), e);
                Vec::new()
            }
        }
    }

    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        let memory = self.memory.as_ref().ok_or(MemoryError::NotConnected)?;
        let mut buffer = vec![0u8; len];
        let mut filled = 0;

        // Positional reads on the shared descriptor; a zero-length read means the range ended.
        while filled < len {
            match memory.read_at(&mut buffer[filled..], addr.as_u64().wrapping_add(filled as u64)) {
                Ok(0) => return Err(MemoryError::read(addr.as_u64(), len)),
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => return Err(MemoryError::read(addr.as_u64(), len)),
            }
        }

        Ok(buffer)
    }

    fn close(&mut self) {
        if self.memory.take().is_some() {
            log::debug!("Closed memory handle for pid {}", self.pid);
        }
    }
}

impl Drop for ProcfsMemory {
    fn drop(&mut self) {
        self.close();
    }
}
