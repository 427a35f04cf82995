// Mon Oct 12 2026 - Alex

use crate::memory::{Address, MemoryError, ModuleRecord, ProcessRecord};

/// An opened view onto another process's address space. Read-only.
pub trait RemoteMemory: Send {
    fn pid(&self) -> u32;

    /// Identity of this particular open; never shared by two opens.
    fn handle_id(&self) -> u64;

    fn is_open(&self) -> bool;

    fn list_modules(&self) -> Vec<ModuleRecord>;

    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError>;

    /// Releases the OS handle. Calling it again is a no-op.
    fn close(&mut self);

    fn read_u32(&self, addr: Address) -> Result<u32, MemoryError> {
        let bytes = self.read_bytes(addr, 4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_u64(&self, addr: Address) -> Result<u64, MemoryError> {
        let bytes = self.read_bytes(addr, 8)?;
        Ok(u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }
}

/// Platform capability set for finding and opening processes.
pub trait ProcessBackend {
    fn name(&self) -> &'static str;

    /// Never fails; enumeration problems yield an empty list.
    fn list_processes(&self) -> Vec<ProcessRecord>;

    fn open_process(&self, process: &ProcessRecord) -> Result<Box<dyn RemoteMemory>, MemoryError>;

    /// Whether `pid` still names a running process as far as this backend can tell.
    fn is_alive(&self, pid: u32) -> bool;
}
