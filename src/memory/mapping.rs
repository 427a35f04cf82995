// Mon Oct 12 2026 - Alex

use crate::memory::ModuleRecord;
use bitflags::bitflags;
use std::collections::HashSet;
use std::path::Path;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MapPerms: u8 {
        const READ = 0b0001;
        const WRITE = 0b0010;
        const EXEC = 0b0100;
        const SHARED = 0b1000;
    }
}

impl MapPerms {
    pub fn parse(flags: &str) -> Self {
        let mut perms = MapPerms::empty();
        for (i, c) in flags.chars().enumerate() {
            match (i, c) {
                (0, 'r') => perms |= MapPerms::READ,
                (1, 'w') => perms |= MapPerms::WRITE,
                (2, 'x') => perms |= MapPerms::EXEC,
                (3, 's') => perms |= MapPerms::SHARED,
                _ => {}
            }
        }
        perms
    }
}

/// One line of `/proc/<pid>/maps`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry {
    pub start: u64,
    pub end: u64,
    pub perms: MapPerms,
    pub offset: u64,
    pub inode: u64,
    pub pathname: Option<String>,
}

impl MapEntry {
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let range = fields.next()?;
        let flags = fields.next()?;
        let offset = fields.next()?;
        let _dev = fields.next()?;
        let inode = fields.next()?;
        let rest: Vec<&str> = fields.collect();

        let (start, end) = range.split_once('-')?;
        let pathname = if rest.is_empty() { None } else { Some(rest.join(" ")) };

        Some(Self {
            start: u64::from_str_radix(start, 16).ok()?,
            end: u64::from_str_radix(end, 16).ok()?,
            perms: MapPerms::parse(flags),
            offset: u64::from_str_radix(offset, 16).ok()?,
            inode: inode.parse().ok()?,
            pathname,
        })
    }

    pub fn is_executable(&self) -> bool {
        self.perms.contains(MapPerms::EXEC)
    }

    /// `[heap]`, `[stack]`, `[vdso]` and friends are not files.
    pub fn is_file_backed(&self) -> bool {
        matches!(&self.pathname, Some(path) if !path.is_empty() && !path.starts_with('['))
    }

    pub fn basename(&self) -> Option<String> {
        let path = self.pathname.as_deref()?;
        Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
    }
}

/// Executable file-backed mappings, one per basename; the first start address wins.
pub fn modules_from_maps(maps: &str) -> Vec<ModuleRecord> {
    let mut seen = HashSet::new();
    let mut modules = Vec::new();

    for entry in maps.lines().filter_map(MapEntry::parse) {
        if !entry.is_executable() || !entry.is_file_backed() {
            continue;
        }
        if let Some(name) = entry.basename() {
            if seen.insert(name.clone()) {
                modules.push(ModuleRecord::new(name, entry.start));
            }
        }
    }

    modules
}
