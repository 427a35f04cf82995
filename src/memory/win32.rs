// Tue Oct 13 2026 - Alex

use crate::memory::process::{next_handle_id, privilege_hint};
use crate::memory::{Address, MemoryError, ModuleRecord, ProcessBackend, ProcessRecord, RemoteMemory};
use std::ffi::c_void;
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, Module32First, Module32Next, Process32First, Process32Next,
    MODULEENTRY32, PROCESSENTRY32, TH32CS_SNAPMODULE, TH32CS_SNAPMODULE32, TH32CS_SNAPPROCESS,
};
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_OPERATION, PROCESS_VM_READ,
};

/// Toolhelp snapshots for listing, `ReadProcessMemory` for reads.
pub struct ToolhelpBackend;

impl ToolhelpBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ToolhelpBackend {
    fn default() -> Self {
        Self::new()
    }
}

// szExeFile/szModule are CHAR arrays; treat each element as a raw byte.
fn c_chars_to_string<T: Copy + Into<i16>>(chars: &[T]) -> Option<String> {
    let bytes: Vec<u8> = chars
        .iter()
        .map(|c| {
            let wide: i16 = (*c).into();
            wide as u8
        })
        .take_while(|b| *b != 0)
        .collect();
    String::from_utf8(bytes).ok()
}

impl ProcessBackend for ToolhelpBackend {
    fn name(&self) -> &'static str {
        "toolhelp"
    }

    fn list_processes(&self) -> Vec<ProcessRecord> {
        let mut processes = Vec::new();

        let snapshot = match unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) } {
            Ok(handle) => handle,
            Err(e) => {
                log::debug!("Process snapshot failed: {}", e);
                return processes;
            }
        };

        let mut entry = PROCESSENTRY32::default();
        entry.dwSize = std::mem::size_of::<PROCESSENTRY32>() as u32;

        if unsafe { Process32First(snapshot, &mut entry) }.is_ok() {
            loop {
                // Names that are not valid UTF-8 are skipped.
                if let Some(name) = c_chars_to_string(&entry.szExeFile) {
                    if entry.th32ProcessID != 0 && !name.is_empty() {
                        processes.push(ProcessRecord { name, pid: entry.th32ProcessID });
                    }
                }
                if unsafe { Process32Next(snapshot, &mut entry) }.is_err() {
                    break;
                }
            }
        }

        let _ = unsafe { CloseHandle(snapshot) };
        processes
    }

    fn is_alive(&self, pid: u32) -> bool {
        self.list_processes().iter().any(|p| p.pid == pid)
    }

    fn open_process(&self, process: &ProcessRecord) -> Result<Box<dyn RemoteMemory>, MemoryError> {
        let handle = unsafe {
            OpenProcess(
                PROCESS_VM_READ | PROCESS_VM_OPERATION | PROCESS_QUERY_INFORMATION,
                false,
                process.pid,
            )
        }
        .map_err(|e| MemoryError::Attach {
            name: process.name.clone(),
            pid: process.pid,
            reason: format!("OpenProcess failed: {}.{}", e, privilege_hint()),
        })?;

        log::debug!("Opened process handle for {} (pid {})", process.name, process.pid);

        Ok(Box::new(WindowsMemory {
            pid: process.pid,
            handle: Some(handle),
            handle_id: next_handle_id(),
        }))
    }
}

pub struct WindowsMemory {
    pid: u32,
    handle: Option<HANDLE>,
    handle_id: u64,
}

// The handle is owned exclusively and only used through the Win32 API.
unsafe impl Send for WindowsMemory {}

impl RemoteMemory for WindowsMemory {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn handle_id(&self) -> u64 {
        self.handle_id
    }

    fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    fn list_modules(&self) -> Vec<ModuleRecord> {
        let mut modules = Vec::new();
        if self.handle.is_none() {
            return modules;
        }

        let snapshot = match unsafe {
            CreateToolhelp32Snapshot(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, self.pid)
        } {
            Ok(handle) => handle,
            Err(e) => {
                log::debug!("Module snapshot for pid {} failed: {}", self.pid, e);
                return modules;
            }
        };

        let mut entry = MODULEENTRY32::default();
        entry.dwSize = std::mem::size_of::<MODULEENTRY32>() as u32;

        if unsafe { Module32First(snapshot, &mut entry) }.is_ok() {
            loop {
                if let Some(name) = c_chars_to_string(&entry.szModule) {
                    modules.push(ModuleRecord::new(name, entry.modBaseAddr as u64));
                }
                if unsafe { Module32Next(snapshot, &mut entry) }.is_err() {
                    break;
                }
            }
        }

        let _ = unsafe { CloseHandle(snapshot) };
        modules
    }

    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        let handle = self.handle.ok_or(MemoryError::NotConnected)?;
        let mut buffer = vec![0u8; len];
        let mut read = 0usize;

        unsafe {
            ReadProcessMemory(
                handle,
                addr.as_u64() as *const c_void,
                buffer.as_mut_ptr() as *mut c_void,
                len,
                Some(&mut read as *mut usize),
            )
        }
        .map_err(|_| MemoryError::read(addr.as_u64(), len))?;

        if read != len {
            return Err(MemoryError::read(addr.as_u64(), len));
        }
        Ok(buffer)
    }

    fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = unsafe { CloseHandle(handle) };
            log::debug!("Closed process handle for pid {}", self.pid);
        }
    }
}

impl Drop for WindowsMemory {
    fn drop(&mut self) {
        self.close();
    }
}
