// Wed Oct 14 2026 - Alex

use crate::emulator::profile::{
    EmulatorId, EmulatorProfile, HostOs, BIZHAWK_FALLBACK_BASE, RAM_SIGNATURE, SIGNATURE_OFFSET,
};
use crate::memory::{find_module, Address, MemoryError, RemoteMemory};
use crate::utils::logging::scoped_timer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleBase {
    /// The profile scans absolute addresses.
    Absolute,
    Found(u64),
    Fallback(u64),
}

impl ModuleBase {
    pub fn address(self) -> u64 {
        match self {
            ModuleBase::Absolute => 0,
            ModuleBase::Found(base) | ModuleBase::Fallback(base) => base,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub guest_ram_base: u64,
    pub module_base: ModuleBase,
    pub offset: u64,
    pub steps: u64,
}

/// Brute-force search of a profile's scan window for the RAM signature.
pub struct AttachmentProbe<'a> {
    profile: &'a EmulatorProfile,
    host: HostOs,
}

impl<'a> AttachmentProbe<'a> {
    pub fn new(profile: &'a EmulatorProfile) -> Self {
        Self { profile, host: HostOs::current() }
    }

    pub fn with_host(mut self, host: HostOs) -> Self {
        self.host = host;
        self
    }

    pub fn run(&self, memory: &dyn RemoteMemory) -> Result<ProbeOutcome, MemoryError> {
        let _timer = scoped_timer(&format!("{} probe", self.profile.display_name));
        let module_base = self.resolve_module_base(memory)?;
        self.scan(memory, module_base)
    }

    pub fn resolve_module_base(&self, memory: &dyn RemoteMemory) -> Result<ModuleBase, MemoryError> {
        let profile = self.profile;
        if !profile.requires_module {
            return Ok(ModuleBase::Absolute);
        }

        let candidates = profile.module_candidates(self.host);
        log::debug!(
            "Searching {} for modules: {}",
            profile.display_name,
            candidates.join(", ")
        );

        let modules = memory.list_modules();
        if let Some(module) = find_module(&modules, &candidates) {
            log::info!(
                "Found module for {}: {} at {}",
                profile.display_name,
                module.name.to_lowercase(),
                module.base
            );
            return Ok(ModuleBase::Found(module.base.as_u64()));
        }

        if profile.id == EmulatorId::BizHawk {
            log::warn!(
                "No mupen64plus module listed for {}, falling back to 0x{:08X}",
                profile.display_name,
                BIZHAWK_FALLBACK_BASE
            );
            return Ok(ModuleBase::Fallback(BIZHAWK_FALLBACK_BASE));
        }

        Err(MemoryError::ModuleNotFound {
            emulator: profile.display_name.to_string(),
            candidates,
        })
    }

    pub fn scan(&self, memory: &dyn RemoteMemory, module_base: ModuleBase) -> Result<ProbeOutcome, MemoryError> {
        let profile = self.profile;
        let base = module_base.address();
        let mut seen_nonzero = false;
        let mut steps = 0u64;

        log::debug!(
            "Scanning {} from 0x{:X} to 0x{:X} ({} steps of {}) relative to 0x{:X}",
            profile.display_name,
            profile.scan_low,
            profile.scan_high,
            profile.scan_steps(),
            profile.scan_step,
            base
        );

        for offset in profile.scan_offsets() {
            steps += 1;

            let read_address = if profile.uses_indirect_pointer {
                match memory.read_u64(Address::new(base.wrapping_add(offset))) {
                    Ok(pointer) => {
                        if pointer != 0 {
                            seen_nonzero = true;
                        }
                        pointer
                    }
                    Err(_) => continue,
                }
            } else {
                base.wrapping_add(offset)
            };

            let ram_base = read_address.wrapping_add(profile.extra_offset);
            let candidate = Address::new(ram_base.wrapping_add(SIGNATURE_OFFSET));

            let value = match memory.read_u32(candidate) {
                Ok(value) => value,
                Err(_) => continue,
            };
            if value != 0 {
                seen_nonzero = true;
            }
            log::trace!("Signature test at {}: 0x{:08X}", candidate, value);

            if value == RAM_SIGNATURE {
                log::info!(
                    "RAM signature found for {} at offset 0x{:X}, guest RAM base 0x{:X}",
                    profile.display_name,
                    offset,
                    ram_base
                );
                return Ok(ProbeOutcome {
                    guest_ram_base: ram_base,
                    module_base,
                    offset,
                    steps,
                });
            }
        }

        if !seen_nonzero {
            log::warn!("Could not read any data from {}", profile.display_name);
            Err(MemoryError::UnreachableProcess(profile.display_name.to_string()))
        } else {
            log::warn!("{} is reachable but the RAM signature never appeared", profile.display_name);
            Err(MemoryError::SignatureNotFound(profile.display_name.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryImage;

    fn small(profile: &EmulatorProfile, low: u64, high: u64) -> EmulatorProfile {
        EmulatorProfile {
            scan_low: low,
            scan_high: high,
            ..profile.clone()
        }
    }

    #[test]
    fn test_direct_scan_returns_exact_base_and_stops() {
        let profile = small(EmulatorId::Project64.profile(), 0x1000, 0x2000);
        let ram = 0x1400u64;
        let mut image = MemoryImage::new().with_zeroed(0x1000, 0x760000 + 0x1000);
        image.poke_u32(ram + SIGNATURE_OFFSET, RAM_SIGNATURE);
        // A later match that must never be reached.
        image.poke_u32(0x1800 + SIGNATURE_OFFSET, RAM_SIGNATURE);
        let memory = image.open(1);

        let outcome = AttachmentProbe::new(&profile).run(&memory).unwrap();
        assert_eq!(outcome.guest_ram_base, ram);
        assert_eq!(outcome.module_base, ModuleBase::Absolute);
        assert_eq!(outcome.steps, (ram - 0x1000) / 16 + 1);
        assert_eq!(memory.stats().reads as u64, outcome.steps);
    }

    #[test]
    fn test_indirect_scan_follows_pointer_and_extra_offset() {
        let rmg = small(EmulatorId::Rmg.profile(), 0x100, 0x200);
        let module_base = 0x7000_0000u64;
        let pointer = 0x1_0000_0000u64;
        let ram = pointer.wrapping_add(rmg.extra_offset);

        let mut image = MemoryImage::new()
            .with_module("RMG.exe", 0x40_0000)
            .with_module("MUPEN64PLUS.DLL", module_base)
            .with_zeroed(module_base, 0x1000)
            .with_zeroed(ram + SIGNATURE_OFFSET, 4);
        image.poke_u64(module_base + 0x180, pointer);
        image.poke_u32(ram + SIGNATURE_OFFSET, RAM_SIGNATURE);
        let memory = image.open(2);

        let outcome = AttachmentProbe::new(&rmg)
            .with_host(HostOs::Windows)
            .run(&memory)
            .unwrap();
        assert_eq!(outcome.module_base, ModuleBase::Found(module_base));
        assert_eq!(outcome.offset, 0x180);
        assert_eq!(outcome.guest_ram_base, ram);
    }

    #[test]
    fn test_nonzero_without_signature_is_signature_not_found() {
        let profile = small(EmulatorId::Project64.profile(), 0x1000, 0x1100);
        let mut image = MemoryImage::new().with_zeroed(0x1000, 0x760000 + 0x200);
        image.poke_u32(0x1020 + SIGNATURE_OFFSET, 0x1234_5678);
        let memory = image.open(1);

        let err = AttachmentProbe::new(&profile).run(&memory).unwrap_err();
        assert!(matches!(err, MemoryError::SignatureNotFound(_)));
    }

    #[test]
    fn test_unreadable_image_is_unreachable() {
        let profile = small(EmulatorId::Project64.profile(), 0x1000, 0x1100);
        let memory = MemoryImage::new().open(1);
        let err = AttachmentProbe::new(&profile).run(&memory).unwrap_err();
        assert!(matches!(err, MemoryError::UnreachableProcess(_)));
        assert_eq!(memory.stats().failed, 16);
    }

    #[test]
    fn test_all_zero_memory_is_unreachable() {
        let profile = small(EmulatorId::Project64.profile(), 0x1000, 0x1100);
        let memory = MemoryImage::new().with_zeroed(0x1000, 0x760000 + 0x200).open(1);
        let err = AttachmentProbe::new(&profile).run(&memory).unwrap_err();
        assert!(matches!(err, MemoryError::UnreachableProcess(_)));
    }

    #[test]
    fn test_nonzero_pointer_alone_counts_as_reachable() {
        let profile = small(EmulatorId::Simple64.profile(), 0x0, 0x20);
        let mut image = MemoryImage::new()
            .with_module("libmupen64plus.dll", 0x9000)
            .with_zeroed(0x9000, 0x100);
        image.poke_u64(0x9000, 0xDEAD_0000);
        let memory = image.open(3);

        let err = AttachmentProbe::new(&profile)
            .with_host(HostOs::Windows)
            .run(&memory)
            .unwrap_err();
        assert!(matches!(err, MemoryError::SignatureNotFound(_)));
    }

    #[test]
    fn test_missing_module_names_candidates() {
        let profile = small(EmulatorId::Simple64.profile(), 0, 0x10);
        let memory = MemoryImage::new().with_module("simple64-gui", 0x1000).open(4);
        match AttachmentProbe::new(&profile).with_host(HostOs::Linux).run(&memory) {
            Err(MemoryError::ModuleNotFound { emulator, candidates }) => {
                assert_eq!(emulator, "simple64");
                assert_eq!(candidates, vec!["libmupen64plus.so".to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bizhawk_falls_back_to_fixed_base() {
        let profile = small(EmulatorId::BizHawk.profile(), 0x5_A000, 0x5_A020);
        let memory = MemoryImage::new().with_module("EmuHawk.exe", 0x40_0000).open(5);
        let probe = AttachmentProbe::new(&profile).with_host(HostOs::Windows);
        assert_eq!(
            probe.resolve_module_base(&memory).unwrap(),
            ModuleBase::Fallback(BIZHAWK_FALLBACK_BASE)
        );
    }
}
