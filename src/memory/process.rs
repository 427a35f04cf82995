// Mon Oct 12 2026 - Alex

use crate::memory::{Address, MemoryError, ProcessBackend, RemoteMemory};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRecord {
    pub name: String,
    pub pid: u32,
}

impl ProcessRecord {
    pub fn new(name: impl Into<String>, pid: u32) -> Self {
        Self { name: name.into(), pid }
    }

    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.name.to_lowercase().starts_with(&prefix.to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleRecord {
    pub name: String,
    pub base: Address,
}

impl ModuleRecord {
    pub fn new(name: impl Into<String>, base: u64) -> Self {
        Self { name: name.into(), base: Address::new(base) }
    }
}

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_handle_id() -> u64 {
    NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed)
}

pub fn find_process(backend: &dyn ProcessBackend, prefix: &str) -> Option<ProcessRecord> {
    backend
        .list_processes()
        .into_iter()
        .find(|p| p.matches_prefix(prefix))
}

pub fn find_processes(backend: &dyn ProcessBackend, prefix: &str) -> Vec<ProcessRecord> {
    backend
        .list_processes()
        .into_iter()
        .filter(|p| p.matches_prefix(prefix))
        .collect()
}

/// Case-insensitive exact match, walking modules in listing order and
/// trying every candidate against each module.
pub fn find_module<'a>(modules: &'a [ModuleRecord], candidates: &[String]) -> Option<&'a ModuleRecord> {
    modules.iter().find(|module| {
        candidates
            .iter()
            .any(|candidate| module.name.eq_ignore_ascii_case(candidate))
    })
}

#[cfg(unix)]
pub(crate) fn privilege_hint() -> &'static str {
    if unsafe { libc::getuid() } == 0 {
        ""
    } else {
        " Root privileges or ptrace access may be required."
    }
}

#[cfg(not(unix))]
pub(crate) fn privilege_hint() -> &'static str {
    " Try running as administrator."
}

pub struct UnsupportedBackend;

impl ProcessBackend for UnsupportedBackend {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn list_processes(&self) -> Vec<ProcessRecord> {
        Vec::new()
    }

    fn is_alive(&self, _pid: u32) -> bool {
        false
    }

    fn open_process(&self, process: &ProcessRecord) -> Result<Box<dyn RemoteMemory>, MemoryError> {
        Err(MemoryError::Attach {
            name: process.name.clone(),
            pid: process.pid,
            reason: "process memory access is not supported on this platform".to_string(),
        })
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn host_backend() -> Box<dyn ProcessBackend> {
    Box::new(crate::memory::linux::ProcfsBackend::new())
}

#[cfg(windows)]
pub fn host_backend() -> Box<dyn ProcessBackend> {
    Box::new(crate::memory::win32::ToolhelpBackend::new())
}

#[cfg(not(any(target_os = "linux", target_os = "android", windows)))]
pub fn host_backend() -> Box<dyn ProcessBackend> {
    Box::new(UnsupportedBackend)
}

pub fn list_processes() -> Vec<ProcessRecord> {
    host_backend().list_processes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_match_ignores_case() {
        let proc = ProcessRecord::new("EmuHawk.exe", 42);
        assert!(proc.matches_prefix("emuhawk"));
        assert!(proc.matches_prefix("EMUHAWK"));
        assert!(!proc.matches_prefix("hawk"));
    }

    #[test]
    fn test_module_match_ignores_case() {
        let modules = vec![
            ModuleRecord::new("EmuHawk.exe", 0x400000),
            ModuleRecord::new("MUPEN64PLUS.DLL", 0x7000_0000),
        ];
        let found = find_module(&modules, &["mupen64plus.dll".to_string()]).unwrap();
        assert_eq!(found.base, Address::new(0x7000_0000));
    }

    #[test]
    fn test_first_listed_module_wins() {
        let modules = vec![
            ModuleRecord::new("libmupen64plus.so", 0x1000),
            ModuleRecord::new("libmupen64plus.so", 0x2000),
        ];
        let candidates = vec!["mupen64plus.so".to_string(), "libmupen64plus.so".to_string()];
        assert_eq!(find_module(&modules, &candidates).unwrap().base, Address::new(0x1000));
        assert!(find_module(&modules, &["rmg".to_string()]).is_none());
    }

    #[test]
    fn test_handle_ids_are_unique() {
        let a = next_handle_id();
        let b = next_handle_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_host_listing_is_well_formed() {
        for process in list_processes() {
            assert!(process.pid > 0);
            assert!(!process.name.is_empty());
        }
    }
}
