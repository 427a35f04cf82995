// Thu Oct 15 2026 - Alex

use crate::emulator::probe::{AttachmentProbe, ModuleBase, ProbeOutcome};
use crate::emulator::profile::{EmulatorProfile, HostOs};
use crate::emulator::translator::{GuestAddressTranslator, GuestMemory, ReadWidth};
use crate::memory::process::find_process;
use crate::memory::{MemoryError, ProcessBackend, ProcessRecord, RemoteMemory};
use std::fmt;

/// A live connection to one emulator: the open handle plus the resolved guest RAM base.
/// The base is fixed for the life of the attachment; re-probing means a new attachment.
pub struct Attachment {
    memory: Box<dyn RemoteMemory>,
    profile: &'static EmulatorProfile,
    process: ProcessRecord,
    guest_ram_base: u64,
    module_base: ModuleBase,
}

impl Attachment {
    pub fn establish(
        backend: &dyn ProcessBackend,
        profile: &'static EmulatorProfile,
    ) -> Result<Self, MemoryError> {
        Self::establish_on(backend, profile, HostOs::current())
    }

    pub fn establish_on(
        backend: &dyn ProcessBackend,
        profile: &'static EmulatorProfile,
        host: HostOs,
    ) -> Result<Self, MemoryError> {
        let process = find_process(backend, profile.process_prefix).ok_or_else(|| {
            log::debug!("Could not find process '{}'", profile.process_prefix);
            MemoryError::ProcessNotFound(profile.process_prefix.to_string())
        })?;

        log::debug!(
            "Trying {} via {} (pid {})",
            profile.display_name,
            process.name,
            process.pid
        );

        let mut memory = backend.open_process(&process)?;

        match AttachmentProbe::new(profile).with_host(host).run(memory.as_ref()) {
            Ok(outcome) => Ok(Self::from_probe(memory, profile, process, outcome)),
            Err(e) => {
                memory.close();
                Err(e)
            }
        }
    }

    pub fn from_probe(
        memory: Box<dyn RemoteMemory>,
        profile: &'static EmulatorProfile,
        process: ProcessRecord,
        outcome: ProbeOutcome,
    ) -> Self {
        Self {
            memory,
            profile,
            process,
            guest_ram_base: outcome.guest_ram_base,
            module_base: outcome.module_base,
        }
    }

    pub fn profile(&self) -> &'static EmulatorProfile {
        self.profile
    }

    pub fn process(&self) -> &ProcessRecord {
        &self.process
    }

    pub fn guest_ram_base(&self) -> u64 {
        self.guest_ram_base
    }

    pub fn module_base(&self) -> ModuleBase {
        self.module_base
    }

    pub fn handle_id(&self) -> u64 {
        self.memory.handle_id()
    }

    pub fn is_open(&self) -> bool {
        self.memory.is_open()
    }

    pub fn translator(&self) -> GuestAddressTranslator<'_> {
        GuestAddressTranslator::new(self.memory.as_ref(), self.guest_ram_base)
    }

    pub fn close(&mut self) {
        if self.memory.is_open() {
            log::debug!("Closing attachment to {} (pid {})", self.profile.display_name, self.process.pid);
        }
        self.memory.close();
    }
}

impl GuestMemory for Attachment {
    fn read(&self, guest_address: u32, width: ReadWidth) -> Result<u32, MemoryError> {
        if !self.memory.is_open() {
            return Err(MemoryError::NotConnected);
        }
        self.translator().read(guest_address, width)
    }
}

impl Drop for Attachment {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("emulator", &self.profile.id)
            .field("process", &self.process)
            .field("guest_ram_base", &format_args!("0x{:X}", self.guest_ram_base))
            .field("handle_id", &self.memory.handle_id())
            .finish()
    }
}
