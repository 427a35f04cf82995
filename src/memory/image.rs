// Tue Oct 13 2026 - Alex

use crate::memory::process::next_handle_id;
use crate::memory::{Address, MemoryError, ModuleRecord, ProcessBackend, ProcessRecord, RemoteMemory};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadStats {
    pub reads: usize,
    pub failed: usize,
}

/// A simulated process address space: sparse byte regions plus a module list.
/// Reads that are not fully inside one region fail like an unmapped page would.
#[derive(Debug, Clone, Default)]
pub struct MemoryImage {
    regions: BTreeMap<u64, Vec<u8>>,
    modules: Vec<ModuleRecord>,
}

impl MemoryImage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, start: u64, bytes: Vec<u8>) -> Self {
        self.regions.insert(start, bytes);
        self
    }

    pub fn with_zeroed(self, start: u64, size: usize) -> Self {
        self.with_region(start, vec![0u8; size])
    }

    pub fn with_module(mut self, name: &str, base: u64) -> Self {
        self.modules.push(ModuleRecord::new(name, base));
        self
    }

    /// Writes into an existing region. Panics if the range is not mapped.
    pub fn poke(&mut self, addr: u64, bytes: &[u8]) {
        let (start, region) = self
            .regions
            .range_mut(..=addr)
            .next_back()
            .expect("poke outside any region");
        let offset = (addr - *start) as usize;
        region[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    pub fn poke_u32(&mut self, addr: u64, value: u32) {
        self.poke(addr, &value.to_le_bytes());
    }

    pub fn poke_u64(&mut self, addr: u64, value: u64) {
        self.poke(addr, &value.to_le_bytes());
    }

    pub fn modules(&self) -> &[ModuleRecord] {
        &self.modules
    }

    pub fn read(&self, addr: u64, len: usize) -> Option<&[u8]> {
        let (start, region) = self.regions.range(..=addr).next_back()?;
        let offset = (addr - start) as usize;
        let end = offset.checked_add(len)?;
        region.get(offset..end)
    }

    pub fn open(self, pid: u32) -> ImageMemory {
        ImageMemory {
            pid,
            image: Arc::new(self),
            open: true,
            handle_id: next_handle_id(),
            stats: Arc::new(Mutex::new(ReadStats::default())),
        }
    }
}

pub struct ImageMemory {
    pid: u32,
    image: Arc<MemoryImage>,
    open: bool,
    handle_id: u64,
    stats: Arc<Mutex<ReadStats>>,
}

impl ImageMemory {
    pub fn stats(&self) -> ReadStats {
        *self.stats.lock()
    }
}

impl RemoteMemory for ImageMemory {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn handle_id(&self) -> u64 {
        self.handle_id
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn list_modules(&self) -> Vec<ModuleRecord> {
        self.image.modules.clone()
    }

    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        if !self.open {
            return Err(MemoryError::NotConnected);
        }
        let mut stats = self.stats.lock();
        stats.reads += 1;
        match self.image.read(addr.as_u64(), len) {
            Some(bytes) => Ok(bytes.to_vec()),
            None => {
                stats.failed += 1;
                Err(MemoryError::read(addr.as_u64(), len))
            }
        }
    }

    fn close(&mut self) {
        self.open = false;
    }
}

/// Lets a test end a simulated process after the backend has been handed off.
#[derive(Debug, Clone, Default)]
pub struct ExitSignal(Arc<Mutex<Vec<u32>>>);

impl ExitSignal {
    pub fn exit(&self, pid: u32) {
        self.0.lock().push(pid);
    }

    pub fn has_exited(&self, pid: u32) -> bool {
        self.0.lock().contains(&pid)
    }
}

/// Backend over a fixed set of simulated processes. Each open hands out a fresh handle.
#[derive(Default)]
pub struct ImageBackend {
    processes: Vec<(ProcessRecord, Arc<MemoryImage>)>,
    denied: Vec<u32>,
    exited: ExitSignal,
}

impl ImageBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_process(mut self, name: &str, pid: u32, image: MemoryImage) -> Self {
        self.processes.push((ProcessRecord::new(name, pid), Arc::new(image)));
        self
    }

    pub fn exit_signal(&self) -> ExitSignal {
        self.exited.clone()
    }

    /// Simulates an open that the OS refuses.
    pub fn deny(mut self, pid: u32) -> Self {
        self.denied.push(pid);
        self
    }
}

impl ProcessBackend for ImageBackend {
    fn name(&self) -> &'static str {
        "image"
    }

    fn list_processes(&self) -> Vec<ProcessRecord> {
        self.processes
            .iter()
            .filter(|(record, _)| !self.exited.has_exited(record.pid))
            .map(|(record, _)| record.clone())
            .collect()
    }

    fn is_alive(&self, pid: u32) -> bool {
        !self.exited.has_exited(pid) && self.processes.iter().any(|(record, _)| record.pid == pid)
    }

    fn open_process(&self, process: &ProcessRecord) -> Result<Box<dyn RemoteMemory>, MemoryError> {
        let attach_error = |reason: &str| MemoryError::Attach {
            name: process.name.clone(),
            pid: process.pid,
            reason: reason.to_string(),
        };

        if self.denied.contains(&process.pid) {
            return Err(attach_error("access denied"));
        }

        let (_, image) = self
            .processes
            .iter()
            .find(|(record, _)| record.pid == process.pid && !self.exited.has_exited(record.pid))
            .ok_or_else(|| attach_error("process exited"))?;

        Ok(Box::new(ImageMemory {
            pid: process.pid,
            image: Arc::clone(image),
            open: true,
            handle_id: next_handle_id(),
            stats: Arc::new(Mutex::new(ReadStats::default())),
        }))
    }
}
